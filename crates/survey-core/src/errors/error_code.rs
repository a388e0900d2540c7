//! SurveyErrorCode trait for structured error reporting.

/// Every error enum implements this so callers (the CLI, JSON output) get a
/// stable code string alongside the human message.
pub trait SurveyErrorCode {
    /// Returns the error code string (e.g., "INGEST_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INGEST_ERROR: &str = "INGEST_ERROR";
pub const DUPLICATE_FILE: &str = "DUPLICATE_FILE";
pub const WORKBOOK_ERROR: &str = "WORKBOOK_ERROR";
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";
pub const COMPLETION_ERROR: &str = "COMPLETION_ERROR";
pub const MISSING_API_KEY: &str = "MISSING_API_KEY";
