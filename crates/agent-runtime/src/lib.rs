//! Agent runtime for executing role-playing agents
//!
//! This crate provides the runtime infrastructure for LLM-backed agents:
//! the `AgentRuntime` that owns the shared provider and model defaults, and
//! the `RoleAgent` that answers a task while playing a role.

pub mod agents;
pub mod runtime;

// Re-export key types
pub use agents::{RoleAgent, RoleConfig, RoleProfile};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
