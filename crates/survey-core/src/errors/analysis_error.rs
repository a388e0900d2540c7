//! Aggregation and reporting errors.

use super::error_code::{self, SurveyErrorCode};
use super::StorageError;

/// Errors raised by the aggregation/reporting layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Unknown file id {file_id}")]
    UnknownFile { file_id: i64 },

    #[error("Unknown {instrument} category '{category}'")]
    UnknownCategory {
        instrument: &'static str,
        category: String,
    },

    #[error("Render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SurveyErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFile { .. } => error_code::NOT_FOUND,
            Self::Storage(e) => e.error_code(),
            _ => error_code::ANALYSIS_ERROR,
        }
    }
}
