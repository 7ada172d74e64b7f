//! Mirror Core - Checkpoint records and quorum evaluation
//!
//! This crate holds the decision logic of the mirroring client: parsing the
//! checkpoint lines monitors persist, tallying agreement on tree size across
//! monitors, and choosing the checkpoint to accept. It performs no I/O.

pub mod checkpoint;
pub mod error;
pub mod quorum;

pub use checkpoint::{Checkpoint, FIELD_SEPARATOR};
pub use error::{Error, Result};
pub use quorum::{
    quorum_threshold, MonitorHistory, QuorumEvaluator, QuorumTally, Selection, HISTORY_WINDOW,
    QUORUM_RATIO,
};

/// Maximum number of entries kept in the accepted checkpoint log
pub const ACCEPTED_LOG_RETENTION: usize = 20;
