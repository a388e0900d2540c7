//! Workbook ingestion errors.

use super::error_code::{self, SurveyErrorCode};
use super::StorageError;

/// Errors that can occur while reading a workbook and loading it.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("File name must not be empty")]
    EmptyFileName,

    #[error("A file named '{name}' was already uploaded")]
    DuplicateFileName { name: String },

    #[error("Cannot open workbook {path}: {message}")]
    WorkbookOpen { path: String, message: String },

    #[error("Cannot read sheet {sheet}: {message}")]
    SheetRead { sheet: String, message: String },

    #[error("Sheet {sheet} is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet {sheet} row {row}: {message}")]
    InvalidRow {
        sheet: String,
        row: usize,
        message: String,
    },

    #[error("Sheet {sheet} row {row}: response {value} outside scale 1..={max}")]
    ResponseOutOfScale {
        sheet: String,
        row: usize,
        value: i64,
        max: u8,
    },

    #[error("Sheet {sheet}: respondent '{respondent_id}' appears more than once")]
    DuplicateRespondent { sheet: String, respondent_id: String },

    #[error("Storage error during ingest: {0}")]
    Storage(#[from] StorageError),
}

impl SurveyErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateFileName { .. } => error_code::DUPLICATE_FILE,
            Self::WorkbookOpen { .. } | Self::SheetRead { .. } => error_code::WORKBOOK_ERROR,
            Self::Storage(e) => e.error_code(),
            _ => error_code::INGEST_ERROR,
        }
    }
}
