//! Aggregation/report configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EDUCATION_ORDER, DEFAULT_NOTABLE_LIMIT, DEFAULT_PROFILE_LIMIT};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Education levels in display order; unlisted levels sort last.
    pub education_order: Vec<String>,
    /// Departments included in whole-file prompts. Default: 8.
    pub profile_limit: Option<usize>,
    /// Notable question scores per instrument in whole-file prompts. Default: 20.
    pub notable_limit: Option<usize>,
}

impl AnalysisConfig {
    pub fn effective_education_order(&self) -> Vec<String> {
        if self.education_order.is_empty() {
            DEFAULT_EDUCATION_ORDER.iter().map(|s| s.to_string()).collect()
        } else {
            self.education_order.clone()
        }
    }

    pub fn effective_profile_limit(&self) -> usize {
        self.profile_limit.unwrap_or(DEFAULT_PROFILE_LIMIT)
    }

    pub fn effective_notable_limit(&self) -> usize {
        self.notable_limit.unwrap_or(DEFAULT_NOTABLE_LIMIT)
    }
}
