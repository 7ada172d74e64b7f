//! Error types for the mirroring client

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for daemon operations
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Errors that can occur in the daemon
///
/// Every variant is fatal for the cycle that produced it.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] mirror_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid monitor glob pattern
    #[error("Invalid monitor pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Finding monitor log files failed
    #[error("Finding monitor files: {0}")]
    Discovery(String),

    /// Reading a monitor's checkpoint log failed
    #[error("Reading checkpoints from {path:?}: {source}")]
    MonitorRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Accepted checkpoint log could not be written or truncated
    #[error("Accepted checkpoint log {path:?}: {source}")]
    AcceptedLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DaemonError {
    fn from(e: serde_json::Error) -> Self {
        DaemonError::Serialization(e.to_string())
    }
}

impl From<glob::GlobError> for DaemonError {
    fn from(e: glob::GlobError) -> Self {
        DaemonError::Discovery(e.to_string())
    }
}
