//! Read-only connections for report queries.
//!
//! Reports only ever read, so they take turns over a small fixed set of
//! query-only connections and never wait on the writer's mutex while an
//! upload is loading.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use survey_core::constants::{DEFAULT_READ_POOL_SIZE, MAX_READ_POOL_SIZE};
use survey_core::errors::StorageError;

use super::pragmas::apply_read_pragmas;
use crate::queries::util::sqlite_error;

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(sqlite_error)?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    turn: AtomicUsize,
}

impl ReadPool {
    /// `size` is clamped to `1..=MAX_READ_POOL_SIZE`.
    pub fn open(path: &Path, size: usize) -> Result<Self, StorageError> {
        let readers = (0..size.clamp(1, MAX_READ_POOL_SIZE))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            readers,
            turn: AtomicUsize::new(0),
        })
    }

    /// Run `f` on whichever reader's turn it is.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let slot = self.turn.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[slot].lock().map_err(|_| StorageError::SqliteError {
            message: format!("reader {slot} lock poisoned"),
        })?;
        f(&conn)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }

    pub fn default_size() -> usize {
        DEFAULT_READ_POOL_SIZE
    }
}
