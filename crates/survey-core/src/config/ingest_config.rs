//! Workbook ingestion configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// Reject responses outside the instrument's scale. Default: true.
    pub validate_scales: Option<bool>,
    /// Fill blank OCI categories from survey-id keywords. Default: true.
    pub infer_oci_categories: Option<bool>,
}

impl IngestConfig {
    pub fn effective_validate_scales(&self) -> bool {
        self.validate_scales.unwrap_or(true)
    }

    pub fn effective_infer_oci_categories(&self) -> bool {
        self.infer_oci_categories.unwrap_or(true)
    }
}
