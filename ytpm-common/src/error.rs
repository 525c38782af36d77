//! Common error types for YTPM

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for YTPM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the monitor
///
/// Every failure is contained within a single monitor cycle; none of these
/// variants is fatal to a scheduled process.
#[derive(Error, Debug)]
pub enum Error {
    /// Playlist listing could not be retrieved (network, removed playlist, access denied)
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Persisted state exists but is not a valid snapshot encoding
    #[error("Corrupt state file {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// Persisting the current snapshot failed
    #[error("Failed to write state file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Outbound notification was rejected or could not be delivered
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input to an operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether the scheduler can simply retry on the next tick
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Extraction(_) | Error::Notifier(_) | Error::Write { .. })
    }
}
