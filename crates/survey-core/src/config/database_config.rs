//! Database configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATABASE_FILE, DEFAULT_READ_POOL_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file. Relative paths resolve against the project root.
    pub path: Option<String>,
    /// Pooled read connections. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl DatabaseConfig {
    pub fn effective_path(&self, root: &Path) -> PathBuf {
        match &self.path {
            Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
            Some(p) => root.join(p),
            None => root.join(DEFAULT_DATABASE_FILE),
        }
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE)
    }
}
