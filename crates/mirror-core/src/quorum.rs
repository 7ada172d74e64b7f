//! Quorum evaluation across monitor histories
//!
//! Each cycle the evaluator receives the short history read from every
//! monitor, counts how many checkpoint observations report each tree size,
//! and picks at most one checkpoint to accept.
//!
//! Votes are counted per checkpoint line, not per monitor: a monitor whose
//! retained window holds two checkpoints at the same size votes twice for
//! that size.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::checkpoint::Checkpoint;
use crate::error::Result;

/// Number of checkpoints retained per monitor
pub const HISTORY_WINDOW: usize = 2;

/// Fraction of the monitor population that must agree on a tree size
pub const QUORUM_RATIO: f64 = 0.75;

/// Quorum threshold for a population of monitors
///
/// `round(0.75 * n)`, rounding half away from zero.
pub fn quorum_threshold(monitors: usize) -> usize {
    (QUORUM_RATIO * monitors as f64).round() as usize
}

/// The most recent checkpoints read from one monitor's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorHistory {
    /// Log file the history was read from
    pub source: PathBuf,

    /// Checkpoints in file order, oldest first
    pub checkpoints: Vec<Checkpoint>,
}

impl MonitorHistory {
    /// Build a history from lines in file order, keeping only the last
    /// [`HISTORY_WINDOW`] of them
    pub fn from_lines<I, S>(source: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut history = Self::empty(source);
        for line in lines {
            history.push(Checkpoint::new(line));
        }
        history
    }

    /// A history with no checkpoints
    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            checkpoints: Vec::with_capacity(HISTORY_WINDOW + 1),
        }
    }

    /// Append a checkpoint, evicting the oldest once the window is full
    pub fn push(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.push(checkpoint);
        if self.checkpoints.len() > HISTORY_WINDOW {
            let excess = self.checkpoints.len() - HISTORY_WINDOW;
            self.checkpoints.drain(..excess);
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

/// Observation counts per tree size, rebuilt every cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuorumTally {
    counts: BTreeMap<i64, usize>,
}

impl QuorumTally {
    /// Count every checkpoint in every history
    ///
    /// Fails on the first checkpoint whose tree size cannot be parsed.
    pub fn from_histories(histories: &[MonitorHistory]) -> Result<Self> {
        let mut tally = Self::default();
        for history in histories {
            for chpt in &history.checkpoints {
                tally.record(chpt.tree_size()?);
            }
        }
        Ok(tally)
    }

    /// Record one observation of `tree_size`
    pub fn record(&mut self, tree_size: i64) {
        *self.counts.entry(tree_size).or_insert(0) += 1;
    }

    /// Number of observations for `tree_size`
    pub fn count(&self, tree_size: i64) -> usize {
        self.counts.get(&tree_size).copied().unwrap_or(0)
    }

    /// Iterate `(tree_size, count)` in ascending size order
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.counts.iter().map(|(&size, &count)| (size, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Threshold applied to this population
    pub threshold: usize,

    /// Tally the decision was based on
    pub tally: QuorumTally,

    /// Checkpoint chosen for the accepted log, if any
    pub accepted: Option<Checkpoint>,

    /// Eligible checkpoints skipped because their timestamp did not parse
    pub skipped: usize,
}

impl Selection {
    /// Line to append to the accepted log
    ///
    /// When nothing reached quorum the accepted log still receives a line,
    /// which is empty.
    pub fn record(&self) -> &str {
        self.accepted.as_ref().map(Checkpoint::as_str).unwrap_or("")
    }
}

/// Picks the accepted checkpoint from a set of monitor histories
#[derive(Debug, Clone, Copy, Default)]
pub struct QuorumEvaluator;

impl QuorumEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the histories collected this cycle
    ///
    /// Checkpoints are scanned in monitor order, then oldest first within a
    /// monitor. A checkpoint is considered when its size reaches quorum and
    /// is at least the running maximum; the running maximum is raised to its
    /// size before its timestamp is looked at. It becomes the candidate when
    /// its timestamp is strictly greater than every timestamp recorded so
    /// far. The recorded timestamp carries over when the running maximum
    /// grows, so ties and near-ties resolve by scan order. The running
    /// maximum starts at zero, so negative sizes are never considered.
    pub fn evaluate(&self, histories: &[MonitorHistory]) -> Result<Selection> {
        let threshold = quorum_threshold(histories.len());
        let tally = QuorumTally::from_histories(histories)?;

        let mut max_tree_size = 0i64;
        let mut largest_timestamp = 0i64;
        let mut accepted = None;
        let mut skipped = 0;

        for history in histories {
            for chpt in &history.checkpoints {
                let tree_size = chpt.tree_size()?;
                if tally.count(tree_size) < threshold || tree_size < max_tree_size {
                    continue;
                }
                max_tree_size = tree_size;

                let timestamp = match chpt.timestamp() {
                    Ok(ts) => ts,
                    Err(e) => {
                        warn!(
                            source = %history.source.display(),
                            tree_size,
                            "Parsing timestamp: {}",
                            e
                        );
                        skipped += 1;
                        continue;
                    }
                };

                if timestamp > largest_timestamp {
                    debug!(tree_size, timestamp, "New candidate checkpoint");
                    largest_timestamp = timestamp;
                    accepted = Some(chpt.clone());
                }
            }
        }

        Ok(Selection {
            threshold,
            tally,
            accepted,
            skipped,
        })
    }
}
