//! Multi-agent orchestration
//!
//! A `Crew` runs a list of `Task`s, each assigned to an agent, following a
//! `Process`. Only the sequential process is implemented.

pub mod crew;
pub mod task;

// Re-export for convenience
pub use crew::{Crew, CrewBuilder, CrewOutput, Process};
pub use task::{Task, TaskOutput};
