//! Mirror Daemon - Quorum client for transparency log monitors
//!
//! This crate provides:
//! - Monitor discovery by glob or monitor list
//! - Reading the latest checkpoints from each monitor log
//! - The accepted checkpoint log with bounded retention
//! - The periodic cycle tying them to the quorum evaluator

pub mod accepted_log;
pub mod config;
pub mod cycle;
pub mod discovery;
pub mod duration;
pub mod error;
pub mod reader;

pub use accepted_log::AcceptedLog;
pub use config::MirrorConfig;
pub use cycle::{Cycle, CycleReport};
pub use discovery::{MonitorList, MonitorSource};
pub use error::{DaemonError, Result};
