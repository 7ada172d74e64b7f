//! Error types for checkpoint parsing and quorum evaluation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Checkpoint is missing field {index}: {checkpoint:?}")]
    MissingField { index: usize, checkpoint: String },

    #[error("Invalid tree size {value:?}: {reason}")]
    InvalidTreeSize { value: String, reason: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl Error {
    /// Whether the cycle may continue past this error.
    ///
    /// Only a malformed timestamp is tolerated; everything else means the
    /// tally would be built on data that cannot be trusted.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidTimestamp(_))
    }
}
