use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskError};

pub const STORAGE_ENV: &str = "TASKER_STORAGE";
/// Honoured for files created by earlier releases.
pub const LEGACY_STORAGE_ENV: &str = "TASK_MANAGER_DB";

const DEFAULT_DIR_NAME: &str = ".tasker";
const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Where the task list lives. Built once at startup and handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage_path: PathBuf,
}

impl Config {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// Resolves the storage path: explicit value, then environment, then `~/.tasker/tasks.json`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(explicit, |key| env::var(key).ok(), dirs::home_dir())
    }

    fn resolve_with<F>(explicit: Option<PathBuf>, lookup: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }

        for key in [STORAGE_ENV, LEGACY_STORAGE_ENV] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                log::debug!("storage path taken from {}", key);
                return Ok(Self::new(value));
            }
        }

        let home = home.ok_or_else(|| {
            TaskError::Config(format!(
                "Could not determine home directory; pass --storage or set {}",
                STORAGE_ENV
            ))
        })?;
        Ok(Self::new(default_storage_path(&home)))
    }
}

pub fn default_storage_path(home: &Path) -> PathBuf {
    home.join(DEFAULT_DIR_NAME).join(DEFAULT_FILE_NAME)
}
