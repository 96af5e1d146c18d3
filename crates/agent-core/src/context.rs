//! Execution context for agents
//!
//! The `Context` struct is a small key-value store that travels with a single
//! run of a crew. It carries identifiers used for log correlation and the raw
//! outputs of tasks that have already finished.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Identifier of the request that started the run
    pub const REQUEST_ID: &str = "request_id";
    /// Name of the task currently executing
    pub const TASK_NAME: &str = "task_name";
    /// Prefix under which finished task outputs are recorded
    pub const TASK_OUTPUT_PREFIX: &str = "task_output.";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new().with_request_id("req-42");
/// ctx.set_task_name("classify");
///
/// assert_eq!(ctx.request_id(), Some("req-42"));
/// assert_eq!(ctx.task_name(), Some("classify"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.insert(keys::REQUEST_ID, serde_json::json!(request_id.into()));
        self
    }

    /// Get the request ID
    pub fn request_id(&self) -> Option<&str> {
        self.get(keys::REQUEST_ID).and_then(|v| v.as_str())
    }

    /// Get the name of the task currently executing
    pub fn task_name(&self) -> Option<&str> {
        self.get(keys::TASK_NAME).and_then(|v| v.as_str())
    }

    /// Set the name of the task currently executing
    pub fn set_task_name(&mut self, name: impl Into<String>) {
        self.insert(keys::TASK_NAME, serde_json::json!(name.into()));
    }

    /// Record the raw output of a finished task
    pub fn record_task_output(&mut self, task: &str, output: &str) {
        self.insert(
            format!("{}{task}", keys::TASK_OUTPUT_PREFIX),
            serde_json::json!(output),
        );
    }

    /// Raw output of a finished task, if it has run
    pub fn task_output(&self, task: &str) -> Option<&str> {
        self.get(&format!("{}{task}", keys::TASK_OUTPUT_PREFIX))
            .and_then(|v| v.as_str())
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
