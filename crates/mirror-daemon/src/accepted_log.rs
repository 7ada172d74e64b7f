//! Accepted checkpoint log
//!
//! The durable output of the client. One accepted checkpoint per line,
//! appended once per cycle and truncated to the most recent entries.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DaemonError, Result};

/// Append-only checkpoint log with bounded retention
#[derive(Debug, Clone)]
pub struct AcceptedLog {
    /// Log file path
    path: PathBuf,

    /// Lines kept after each append
    retention: usize,
}

impl AcceptedLog {
    /// Create a handle; the file is created on first append
    pub fn new(path: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            path: path.into(),
            retention,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> DaemonError {
        DaemonError::AcceptedLog {
            path: self.path.clone(),
            source,
        }
    }

    /// Append one record followed by a newline, then enforce retention
    ///
    /// An empty record still produces a line. Returns the number of old
    /// lines dropped.
    pub fn append(&self, record: &str) -> Result<usize> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(&self.path).map_err(|e| self.io_err(e))?;
        writeln!(file, "{}", record).map_err(|e| self.io_err(e))?;
        file.flush().map_err(|e| self.io_err(e))?;
        drop(file);

        self.enforce_retention()
    }

    /// Current entries, oldest first
    pub fn entries(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| self.io_err(e))
    }

    /// Rewrite the log with only the last `retention` lines
    ///
    /// Leaves the file untouched when it is already within bounds. The file
    /// is truncated and rewritten in place, so its mode and any symlink
    /// pointing at it survive. Assumes nothing else writes the file
    /// concurrently.
    pub fn enforce_retention(&self) -> Result<usize> {
        let lines = self.entries()?;
        if lines.len() <= self.retention {
            return Ok(0);
        }

        let dropped = lines.len() - self.retention;
        let mut content = String::new();
        for line in &lines[dropped..] {
            content.push_str(line);
            content.push('\n');
        }

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| self.io_err(e))?;
        file.flush().map_err(|e| self.io_err(e))?;

        debug!(
            path = %self.path.display(),
            dropped,
            kept = self.retention,
            "Truncated accepted checkpoint log"
        );
        Ok(dropped)
    }
}
