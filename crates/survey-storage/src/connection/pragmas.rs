//! Connection settings for the survey database.
//!
//! The writer journals in WAL mode and enforces foreign keys, which is what
//! makes deleting an upload cascade to its respondents, responses, and
//! narratives. Pooled readers are query-only.

use rusqlite::Connection;
use survey_core::errors::StorageError;

const BUSY_TIMEOUT_MS: u32 = 5_000;
/// Negative values are KiB: 16 MiB of page cache per connection.
const CACHE_SIZE: i64 = -16_000;
const AUTO_VACUUM_INCREMENTAL: i64 = 2;

fn pragma_error(stage: &str, e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: format!("{stage}: {e}"),
    }
}

fn apply_common(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "PRAGMA cache_size = {CACHE_SIZE};
         PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};
         PRAGMA temp_store = MEMORY;"
    ))
    .map_err(|e| pragma_error("failed to apply connection settings", e))
}

/// Configure the single write connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;",
    )
    .map_err(|e| pragma_error("failed to apply writer settings", e))?;
    apply_common(conn)?;
    ensure_incremental_vacuum(conn)
}

/// Retention releases pages with `incremental_vacuum`, which is a no-op
/// unless `auto_vacuum` is INCREMENTAL. An existing file only switches
/// modes after a full VACUUM.
fn ensure_incremental_vacuum(conn: &Connection) -> Result<(), StorageError> {
    let mode: i64 = conn
        .pragma_query_value(None, "auto_vacuum", |row| row.get(0))
        .map_err(|e| pragma_error("failed to read auto_vacuum", e))?;
    if mode == AUTO_VACUUM_INCREMENTAL {
        return Ok(());
    }
    conn.execute_batch("PRAGMA auto_vacuum = INCREMENTAL; VACUUM;")
        .map_err(|e| pragma_error("failed to enable incremental auto_vacuum", e))
}

/// Configure a pooled reader.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA query_only = ON;")
        .map_err(|e| pragma_error("failed to apply reader settings", e))?;
    apply_common(conn)
}

/// Settings a connection actually ended up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaStatus {
    /// `wal` for files, `memory` for in-memory databases.
    pub journal_mode: String,
    pub foreign_keys: bool,
}

impl PragmaStatus {
    pub fn read(conn: &Connection) -> Result<Self, StorageError> {
        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .map_err(|e| pragma_error("failed to read journal_mode", e))?;
        let foreign_keys: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .map_err(|e| pragma_error("failed to read foreign_keys", e))?;
        Ok(Self {
            journal_mode,
            foreign_keys: foreign_keys == 1,
        })
    }

    pub fn is_wal(&self) -> bool {
        self.journal_mode.eq_ignore_ascii_case("wal")
    }
}
