//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::discovery::MonitorSource;

/// Default glob matching monitor checkpoint logs
pub const DEFAULT_MONITOR_PATTERN: &str = "logInfo*.txt";

/// Default accepted checkpoint log file name
pub const ACCEPTED_CHPT_FILE: &str = "accepted_chpt.txt";

/// Conventional name of the optional monitor list
pub const MONITOR_LIST_FILE: &str = "monitor_list.json";

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "MIRROR_CONFIG";

/// Mirroring client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Directory monitors write into; relative paths below resolve against it
    pub work_dir: PathBuf,

    /// Glob matching monitor checkpoint logs
    pub monitor_pattern: String,

    /// Monitor list to use instead of the glob
    pub monitor_list: Option<PathBuf>,

    /// Accepted checkpoint log
    pub accepted_log: PathBuf,

    /// Entries kept in the accepted log
    pub retention: usize,

    /// Seconds between cycles
    pub interval_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            monitor_pattern: DEFAULT_MONITOR_PATTERN.to_string(),
            monitor_list: None,
            accepted_log: PathBuf::from(ACCEPTED_CHPT_FILE),
            retention: mirror_core::ACCEPTED_LOG_RETENTION,
            interval_secs: 60,
        }
    }
}

impl MirrorConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$MIRROR_CONFIG` if set, otherwise defaults
    pub fn from_env() -> crate::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the cycle cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.retention == 0 {
            return Err(crate::DaemonError::Config(
                "retention must be at least 1".to_string(),
            ));
        }
        if self.monitor_list.is_none() && self.monitor_pattern.trim().is_empty() {
            return Err(crate::DaemonError::Config(
                "monitor_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Where monitors are discovered from
    pub fn monitor_source(&self) -> MonitorSource {
        match &self.monitor_list {
            Some(list) => MonitorSource::List(self.resolve(list)),
            None => MonitorSource::Glob(self.monitor_pattern.clone()),
        }
    }

    /// Accepted log path, resolved against the working directory
    pub fn accepted_log_path(&self) -> PathBuf {
        self.resolve(&self.accepted_log)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}
