//! Helpers shared by the query modules.

use rusqlite::{Error, ErrorCode};
use survey_core::errors::storage_error::SqliteCode;
use survey_core::errors::StorageError;

/// Map a rusqlite error, classifying busy/locked and constraint failures.
pub fn sqlite_error(e: Error) -> StorageError {
    let code = match &e {
        Error::SqliteFailure(err, _) => match err.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => Some(SqliteCode::Busy),
            ErrorCode::ConstraintViolation => Some(SqliteCode::Constraint),
            _ => None,
        },
        _ => None,
    };
    StorageError::from_sqlite_message(code, e.to_string())
}

/// Current unix time in seconds.
pub fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Seconds in `days` days.
pub fn days_to_secs(days: u32) -> i64 {
    i64::from(days) * 86_400
}
