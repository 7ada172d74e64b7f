//! Checkpoint reader
//!
//! Reads the most recent checkpoints from a monitor's log. The file is
//! scanned top to bottom and only the last two lines are kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use mirror_core::{Checkpoint, MonitorHistory};
use tracing::trace;

use crate::error::{DaemonError, Result};

/// Read the latest checkpoints from one monitor log
pub fn read_latest_checkpoints(path: &Path) -> Result<MonitorHistory> {
    let read_err = |source| DaemonError::MonitorRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut history = MonitorHistory::empty(path);
    for line in BufReader::new(file).lines() {
        history.push(Checkpoint::new(line.map_err(read_err)?));
    }

    trace!(path = %path.display(), retained = history.len(), "Read monitor log");
    Ok(history)
}

/// Read every monitor log in order, stopping at the first failure
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<MonitorHistory>> {
    paths.iter().map(|p| read_latest_checkpoints(p)).collect()
}
