//! Monitor discovery
//!
//! Monitors are not configured individually. Each cycle the working
//! directory is globbed for checkpoint logs, so monitors that start or stop
//! between cycles are picked up without a restart. A monitor list file can
//! be used instead when the log files do not share a naming scheme.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DaemonError, Result};

/// Where the set of monitors comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorSource {
    /// Files in the working directory matching a glob
    Glob(String),
    /// Log files enumerated in a JSON monitor list
    List(PathBuf),
}

/// A monitor entry in `monitor_list.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorEntry {
    /// Free-form description
    pub description: String,

    /// Path to the monitor's checkpoint log
    pub logfile: PathBuf,
}

/// Contents of `monitor_list.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorList {
    pub monitors: Vec<MonitorEntry>,
}

impl MonitorList {
    /// Load a monitor list from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let list: Self = serde_json::from_str(&content)?;
        Ok(list)
    }

    /// Log file paths in list order
    pub fn logfiles(&self) -> Vec<PathBuf> {
        self.monitors.iter().map(|m| m.logfile.clone()).collect()
    }
}

impl MonitorSource {
    /// Find the monitor log files for this cycle
    ///
    /// Zero matches is not an error.
    pub fn discover(&self, work_dir: &Path) -> Result<Vec<PathBuf>> {
        match self {
            MonitorSource::Glob(pattern) => discover_glob(work_dir, pattern),
            MonitorSource::List(path) => {
                let list = MonitorList::load(path)?;
                for monitor in &list.monitors {
                    debug!(
                        description = %monitor.description,
                        logfile = %monitor.logfile.display(),
                        "Listed monitor"
                    );
                }
                Ok(list
                    .logfiles()
                    .into_iter()
                    .map(|logfile| {
                        if logfile.is_absolute() {
                            logfile
                        } else {
                            work_dir.join(logfile)
                        }
                    })
                    .collect())
            }
        }
    }
}

/// Glob `pattern` inside `work_dir`, returning matches in lexical order
fn discover_glob(work_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = work_dir.to_str().ok_or_else(|| {
        DaemonError::Config(format!("working directory is not valid UTF-8: {:?}", work_dir))
    })?;
    let full_pattern = Path::new(&glob::Pattern::escape(dir)).join(pattern);

    let mut paths = glob::glob(&full_pattern.to_string_lossy())?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    paths.sort();

    debug!("Found {} monitor log(s) matching {:?}", paths.len(), full_pattern);
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_discovery_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["logInfo2.txt", "logInfo0.txt", "logInfo10.txt", "other.txt", "logInfo1.log"] {
            std::fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let source = MonitorSource::Glob("logInfo*.txt".to_string());
        let found = source.discover(temp_dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["logInfo0.txt", "logInfo10.txt", "logInfo2.txt"]);
    }

    #[test]
    fn test_no_monitors_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let source = MonitorSource::Glob("logInfo*.txt".to_string());
        assert!(source.discover(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = MonitorSource::Glob("logInfo[.txt".to_string());
        assert!(matches!(
            source.discover(temp_dir.path()),
            Err(DaemonError::Pattern(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_monitor_list() {
        let temp_dir = TempDir::new().unwrap();
        let list_path = temp_dir.path().join("monitor_list.json");
        std::fs::write(
            &list_path,
            r#"{"monitors": [
                {"description": "primary", "logfile": "a.txt"},
                {"description": "backup", "logfile": "/var/log/b.txt"}
            ]}"#,
        )
        .unwrap();

        let source = MonitorSource::List(list_path);
        let found = source.discover(temp_dir.path()).unwrap();
        assert_eq!(
            found,
            vec![temp_dir.path().join("a.txt"), PathBuf::from("/var/log/b.txt")]
        );
    }

    #[test]
    fn test_missing_monitor_list_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = MonitorSource::List(temp_dir.path().join("monitor_list.json"));
        assert!(matches!(
            source.discover(temp_dir.path()),
            Err(DaemonError::Io(_))
        ));
    }
}
