//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive file exists but does not hold a JSON array of messages.
    #[error("Malformed message archive {path}: {reason}")]
    MalformedArchive {
        /// Archive location.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
