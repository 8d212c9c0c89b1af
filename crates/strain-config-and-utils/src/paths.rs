//! File system paths for Strainlog.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Base directory name under the user's home.
const BASE_DIR_NAME: &str = ".strainlog";
/// JSONL log file name under the logs directory.
const LOG_FILE_NAME: &str = "strainlog.jsonl";

/// Manages file system paths for Strainlog.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for local files (~/.strainlog)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.strainlog`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the config file path (~/.strainlog/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the logs directory (~/.strainlog/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (~/.strainlog/logs/strainlog.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted_at_base_dir() {
        let paths = Paths::with_base_dir(PathBuf::from("/tmp/strainlog-test"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/strainlog-test/config.json")
        );
        assert_eq!(
            paths.log_file(),
            PathBuf::from("/tmp/strainlog-test/logs/strainlog.jsonl")
        );
    }
}
