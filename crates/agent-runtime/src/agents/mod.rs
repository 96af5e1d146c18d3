//! Concrete agent implementations
//!
//! - RoleAgent: LLM agent that plays a role with a goal and backstory

pub mod role;

pub use role::{RoleAgent, RoleConfig, RoleProfile};
