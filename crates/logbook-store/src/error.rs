//! Error types for the storage engine.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the storage engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing database could not be opened or a statement failed.
    #[error("store unavailable: {0}")]
    Store(#[from] rusqlite::Error),

    /// I/O error (e.g., creating the database's parent directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata payload could not be serialized to canonical JSON text.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The input failed validation before any statement was attempted.
    #[error(transparent)]
    Invalid(#[from] logbook_core::Error),

    /// No row matched the given identifier or name.
    #[error("{0} not found")]
    NotFound(String),
}
