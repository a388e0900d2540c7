//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use survey_core::config::DatabaseConfig;
use survey_core::errors::StorageError;

use self::pool::ReadPool;
use self::pragmas::{apply_pragmas, PragmaStatus};
use crate::migrations;
use crate::queries::util::sqlite_error;

/// Apply pragmas, confirm foreign keys took effect, then migrate.
fn prepare_writer(conn: &Connection, file_backed: bool) -> Result<(), StorageError> {
    apply_pragmas(conn)?;
    let status = PragmaStatus::read(conn)?;
    if !status.foreign_keys {
        return Err(StorageError::SqliteError {
            message: "foreign key enforcement could not be enabled".to_string(),
        });
    }
    if file_backed && !status.is_wal() {
        tracing::warn!(journal_mode = %status.journal_mode, "database is not in WAL mode");
    }
    migrations::run_migrations(conn)
}

/// Owns the single write connection and the read connection pool.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    /// `None` for in-memory databases, whose data a second connection
    /// cannot see. Reads then go through the writer.
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at the given path with the default read pool size.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_pool_size(path, ReadPool::default_size())
    }

    /// Open a database, apply pragmas, run migrations, then open readers.
    pub fn open_with_pool_size(path: &Path, pool_size: usize) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::SqliteError {
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
        let writer = Connection::open(path).map_err(sqlite_error)?;
        prepare_writer(&writer, true)?;

        let readers = ReadPool::open(path, pool_size)?;
        tracing::debug!(path = %path.display(), readers = readers.size(), "database opened");

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the database described by `[database]` config, relative to `root`.
    pub fn from_config(config: &DatabaseConfig, root: &Path) -> Result<Self, StorageError> {
        Self::open_with_pool_size(
            &config.effective_path(root),
            config.effective_read_pool_size(),
        )
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(sqlite_error)?;
        prepare_writer(&writer, false)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Execute `f` inside a `BEGIN IMMEDIATE` transaction on the writer.
    /// Any error rolls the whole transaction back.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, StorageError>,
    {
        self.with_writer(|conn| writer::with_immediate_transaction(conn, f))
    }

    /// Execute a read operation with a pooled read connection.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Fold the WAL back into the main file and truncate it. In-memory
    /// databases have no WAL, so this does nothing for them.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        if self.path.is_none() {
            return Ok(());
        }
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(sqlite_error)
        })
    }

    /// Number of pooled readers (0 when reads share the writer).
    pub fn reader_count(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::size)
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("path", &self.path)
            .field("readers", &self.reader_count())
            .finish()
    }
}
