//! Shared utilities
//!
//! Logging setup and helpers for reading configuration from the environment.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_or, env_parse, env_required};
pub use logging::{LogFormat, init_tracing};
