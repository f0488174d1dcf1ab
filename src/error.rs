//! Error types for veridoc.

use thiserror::Error;

/// Errors produced by veridoc operations.
///
/// Lookup-path faults never surface through this type; the stores convert
/// them to [`crate::record::LookupResult::StoreError`] at their own
/// boundary. This enum covers construction, configuration, and the
/// producer-side write path.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A verification request could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The local document store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A document record could not be encoded or decoded.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for veridoc operations.
pub type Result<T> = std::result::Result<T, Error>;
