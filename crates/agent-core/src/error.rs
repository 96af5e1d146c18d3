//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Agent or workflow construction failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ProcessingFailed("model unavailable".to_string());
        assert_eq!(err.to_string(), "Agent processing failed: model unavailable");

        let err = Error::InitializationFailed("crew has no tasks".to_string());
        assert_eq!(err.to_string(), "Agent initialization failed: crew has no tasks");
    }
}
