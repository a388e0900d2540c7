//! Top-level error aggregating every subsystem.

use super::error_code::SurveyErrorCode;
use super::{AnalysisError, CompletionError, ConfigError, IngestError, StorageError};

/// Errors surfaced by workspace-level operations.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
}

impl SurveyErrorCode for SurveyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Ingest(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
            Self::Completion(e) => e.error_code(),
        }
    }
}
