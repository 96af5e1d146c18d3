//! Error types for stock advisor operations

use thiserror::Error;

/// Stock advisor errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Symbol is empty or contains characters no ticker uses
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Alpha Vantage answered with an error payload or status
    #[error("Alpha Vantage error: {0}")]
    AlphaVantage(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Symbol catalog could not be read
    #[error("Catalog error: {0}")]
    Catalog(#[from] csv::Error),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for stock advisor operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<agent_utils::ConfigError> for StockError {
    fn from(err: agent_utils::ConfigError) -> Self {
        StockError::Config(err.to_string())
    }
}

impl From<agent_core::Error> for StockError {
    fn from(err: agent_core::Error) -> Self {
        StockError::Other(err.to_string())
    }
}
