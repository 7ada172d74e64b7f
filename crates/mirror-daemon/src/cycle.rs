//! The periodic quorum cycle
//!
//! Each cycle discovers monitors, reads their latest checkpoints, evaluates
//! quorum and appends the result to the accepted log. Cycles share nothing
//! in memory; the only carried state is on disk.

use std::path::PathBuf;
use std::time::Duration;

use mirror_core::{Checkpoint, QuorumEvaluator};
use tracing::{info, warn};

use crate::accepted_log::AcceptedLog;
use crate::config::MirrorConfig;
use crate::discovery::MonitorSource;
use crate::error::Result;
use crate::reader;

/// Summary of one completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Monitor logs read
    pub monitors: usize,

    /// Quorum threshold applied
    pub threshold: usize,

    /// Checkpoint appended, or `None` when an empty line was appended
    pub accepted: Option<Checkpoint>,

    /// Eligible checkpoints skipped for a bad timestamp
    pub skipped: usize,

    /// Old accepted-log lines dropped by retention
    pub dropped: usize,
}

/// Discover, read, evaluate, append
#[derive(Debug, Clone)]
pub struct Cycle {
    work_dir: PathBuf,
    source: MonitorSource,
    evaluator: QuorumEvaluator,
    accepted_log: AcceptedLog,
}

impl Cycle {
    pub fn new(work_dir: impl Into<PathBuf>, source: MonitorSource, accepted_log: AcceptedLog) -> Self {
        Self {
            work_dir: work_dir.into(),
            source,
            evaluator: QuorumEvaluator::new(),
            accepted_log,
        }
    }

    /// Build a cycle from configuration
    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(
            config.work_dir.clone(),
            config.monitor_source(),
            AcceptedLog::new(config.accepted_log_path(), config.retention),
        )
    }

    pub fn accepted_log(&self) -> &AcceptedLog {
        &self.accepted_log
    }

    /// Run a single cycle
    ///
    /// Any error means the cycle's input or output cannot be trusted and is
    /// returned without appending anything.
    pub fn run_once(&self) -> Result<CycleReport> {
        let monitors = self.source.discover(&self.work_dir)?;
        let histories = reader::read_all(&monitors)?;
        let selection = self.evaluator.evaluate(&histories)?;
        let dropped = self.accepted_log.append(selection.record())?;

        match &selection.accepted {
            Some(chpt) => info!(
                monitors = monitors.len(),
                threshold = selection.threshold,
                tree_size = chpt.tree_size().ok(),
                origin = chpt.origin().unwrap_or_default(),
                root_hash = chpt.root_hash().unwrap_or_default(),
                "Accepted checkpoint"
            ),
            None => warn!(
                monitors = monitors.len(),
                threshold = selection.threshold,
                "No tree size reached quorum"
            ),
        }

        Ok(CycleReport {
            monitors: monitors.len(),
            threshold: selection.threshold,
            accepted: selection.accepted,
            skipped: selection.skipped,
            dropped,
        })
    }

    /// Run cycles until one fails, sleeping `interval` between them
    pub async fn run_forever(&self, interval: Duration) -> Result<()> {
        loop {
            self.run_once()?;
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cycle_in(dir: &TempDir) -> Cycle {
        let config = MirrorConfig {
            work_dir: dir.path().to_path_buf(),
            ..MirrorConfig::default()
        };
        Cycle::from_config(&config)
    }

    #[test]
    fn test_zero_monitors_appends_empty_line() {
        let temp_dir = TempDir::new().unwrap();
        let cycle = cycle_in(&temp_dir);

        let report = cycle.run_once().unwrap();
        assert_eq!(report.monitors, 0);
        assert_eq!(report.threshold, 0);
        assert_eq!(report.accepted, None);
        assert_eq!(cycle.accepted_log().entries().unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_accepts_agreed_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        let line = r"O\n7\nHASH\ntimestamp: 70";
        for i in 0..3 {
            std::fs::write(temp_dir.path().join(format!("logInfo{}.txt", i)), format!("{}\n", line))
                .unwrap();
        }

        let cycle = cycle_in(&temp_dir);
        let report = cycle.run_once().unwrap();
        assert_eq!(report.monitors, 3);
        assert_eq!(report.threshold, 2);
        assert_eq!(report.accepted, Some(Checkpoint::new(line)));
        assert_eq!(cycle.accepted_log().entries().unwrap(), vec![line.to_string()]);
    }

    #[test]
    fn test_bad_tree_size_appends_nothing() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("logInfo0.txt"), "O\\nbad\\nH\\nt: 1\n").unwrap();

        let cycle = cycle_in(&temp_dir);
        assert!(cycle.run_once().is_err());
        assert!(!cycle.accepted_log().path().exists());
    }

    #[tokio::test]
    async fn test_run_forever_stops_on_fatal_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("logInfo0.txt"), "O\\nbad\\nH\\nt: 1\n").unwrap();

        let cycle = cycle_in(&temp_dir);
        let result = cycle.run_forever(Duration::from_millis(1)).await;
        assert!(result.is_err());
    }
}
