//! Task definition

use agent_core::Agent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A unit of work assigned to one agent
///
/// The description is sent to the agent as-is, followed by the expected
/// output criteria. Any data the agent needs must already be in the
/// description.
#[derive(Clone)]
pub struct Task {
    name: String,
    description: String,
    expected_output: String,
    agent: Arc<dyn Agent>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<dyn Agent>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    /// Full prompt handed to the agent
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        )
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent.name())
            .field("expected_output", &self.expected_output)
            .finish_non_exhaustive()
    }
}

/// Raw answer produced by one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub name: String,
    /// Name of the agent that answered
    pub agent: String,
    /// The agent's answer
    pub raw: String,
}
