//! Storage errors.

use super::error_code::{self, SurveyErrorCode};

/// Errors raised by the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database busy")]
    DbBusy,

    #[error("Constraint violated: {message}")]
    ConstraintViolation { message: String },

    #[error("Migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

impl StorageError {
    /// Classify a rusqlite error message into busy / constraint / generic.
    pub fn from_sqlite_message(code: Option<SqliteCode>, message: String) -> Self {
        match code {
            Some(SqliteCode::Busy) => Self::DbBusy,
            Some(SqliteCode::Constraint) => Self::ConstraintViolation { message },
            None => Self::SqliteError { message },
        }
    }
}

/// The subset of SQLite primary result codes the workspace reacts to.
/// Kept free of the rusqlite type so `survey-core` does not link SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteCode {
    Busy,
    Constraint,
}

impl SurveyErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::DbBusy => error_code::DB_BUSY,
            Self::ConstraintViolation { .. } => error_code::CONSTRAINT_VIOLATION,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::NotFound { .. } => error_code::NOT_FOUND,
        }
    }
}
