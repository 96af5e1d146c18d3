//! Web layer: routes, sessions, login and page templates

pub mod auth;
pub mod flash;
pub mod routes;
pub mod session;
pub mod templates;

pub use auth::{CredentialStore, StaticCredentialStore};
pub use routes::{AppError, AppState, create_router};
pub use flash::{FLASH_COOKIE, Flash};
pub use session::{SESSION_COOKIE, SessionStore};
pub use templates::Templates;
