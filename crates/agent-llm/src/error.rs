//! Errors raised while talking to a chat-completion backend

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status without a more specific mapping
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// 401 from the backend
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// 429 from the backend; carries the response body
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// 400 from the backend, or a model outside the allow-list
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Response body was not the expected JSON
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Well-formed JSON that cannot be turned into a completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
