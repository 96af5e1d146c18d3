//! Helpers for reading configuration from environment variables

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("missing required environment variable {0}")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Raw value of `name`, treating blank values as unset
fn lookup(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Value of a variable that must be set
pub fn env_required(name: &str) -> Result<String, ConfigError> {
    lookup(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Value of a variable, or `default` when unset
pub fn env_or(name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

/// Parsed value of a variable, or `default` when unset
pub fn env_parse<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name so they can run in parallel.

    #[test]
    fn test_required_missing() {
        assert_eq!(
            env_required("AGENT_UTILS_TEST_NEVER_SET"),
            Err(ConfigError::Missing("AGENT_UTILS_TEST_NEVER_SET".to_string()))
        );
    }

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("AGENT_UTILS_TEST_NEVER_SET_2", "fallback"), "fallback");
    }

    #[test]
    fn test_env_parse_default_and_value() {
        assert_eq!(env_parse("AGENT_UTILS_TEST_NEVER_SET_3", 30_u64), Ok(30));

        // SAFETY: variable is unique to this test
        unsafe { std::env::set_var("AGENT_UTILS_TEST_TIMEOUT", " 45 ") };
        assert_eq!(env_parse("AGENT_UTILS_TEST_TIMEOUT", 30_u64), Ok(45));
    }

    #[test]
    fn test_env_parse_invalid() {
        // SAFETY: variable is unique to this test
        unsafe { std::env::set_var("AGENT_UTILS_TEST_BAD_BOOL", "maybe") };
        let err = env_parse("AGENT_UTILS_TEST_BAD_BOOL", true).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "AGENT_UTILS_TEST_BAD_BOOL"));
    }
}
