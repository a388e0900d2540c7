//! Write transactions.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use survey_core::errors::StorageError;

use crate::queries::util::sqlite_error;

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// The write lock is taken up front so the body never hits SQLITE_BUSY
/// halfway through. The transaction rolls back if `f` returns an error.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    // `new_unchecked` takes `&Connection`; dropping the guard uncommitted
    // rolls back.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        match sqlite_error(e) {
            StorageError::SqliteError { message } => StorageError::SqliteError {
                message: format!("failed to begin immediate transaction: {message}"),
            },
            other => other,
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(sqlite_error)?;

    Ok(result)
}
