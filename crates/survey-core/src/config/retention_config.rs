//! Retention / maintenance configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FILE_RETENTION_DAYS, DEFAULT_NARRATIVE_RETENTION_DAYS, DEFAULT_RECENT_FILE_LIMIT,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RetentionConfig {
    /// Days an uploaded file is kept. Default: 30.
    pub file_days: Option<u32>,
    /// Days a narrative is kept after creation. Default: 30.
    pub narrative_days: Option<u32>,
    /// Rows in the recent-uploads listing. Default: 20.
    pub recent_file_limit: Option<usize>,
}

impl RetentionConfig {
    pub fn effective_file_days(&self) -> u32 {
        self.file_days.unwrap_or(DEFAULT_FILE_RETENTION_DAYS)
    }

    pub fn effective_narrative_days(&self) -> u32 {
        self.narrative_days.unwrap_or(DEFAULT_NARRATIVE_RETENTION_DAYS)
    }

    pub fn effective_recent_file_limit(&self) -> usize {
        self.recent_file_limit.unwrap_or(DEFAULT_RECENT_FILE_LIMIT)
    }
}
