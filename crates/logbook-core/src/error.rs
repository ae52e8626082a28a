//! Error types shared across the logbook crates.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation errors for inputs that never reach the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A severity string that is not one of the defined levels.
    #[error("invalid severity level '{0}' (expected debug, info, warn, or error)")]
    InvalidLevel(String),

    /// A filter combination that cannot be executed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A source name that fails the registry's constraints.
    #[error("invalid source name: {0}")]
    InvalidSourceName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_display() {
        let err = Error::InvalidLevel("verbose".to_string());
        let msg = err.to_string();
        assert!(msg.contains("verbose"));
        assert!(msg.contains("invalid severity level"));
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = Error::InvalidFilter("offset requires a limit".to_string());
        assert!(err.to_string().contains("offset requires a limit"));
    }
}
