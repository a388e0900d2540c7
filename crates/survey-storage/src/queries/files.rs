//! Queries for `uploaded_files`.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::types::FileId;

use super::util::sqlite_error;

/// Status of a file whose load has started but not committed.
pub const STATUS_PENDING: &str = "pending";
/// Status of a fully loaded file.
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub file_id: FileId,
    pub file_name: String,
    pub status: String,
    pub uploaded_at: i64,
}

/// Row counts loaded from one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileCounts {
    pub respondents: i64,
    pub oci_responses: i64,
    pub cgs_responses: i64,
    pub narratives: i64,
}

const FILE_COLUMNS: &str = "file_id, file_name, status, uploaded_at";

fn map_file(row: &Row<'_>) -> rusqlite::Result<FileRow> {
    Ok(FileRow {
        file_id: row.get(0)?,
        file_name: row.get(1)?,
        status: row.get(2)?,
        uploaded_at: row.get(3)?,
    })
}

/// Register a new file with status `pending`. Returns the new id.
pub fn insert_file(conn: &Connection, file_name: &str, uploaded_at: i64) -> Result<FileId, StorageError> {
    conn.execute(
        "INSERT INTO uploaded_files (file_name, status, uploaded_at) VALUES (?1, ?2, ?3)",
        params![file_name, STATUS_PENDING, uploaded_at],
    )
    .map_err(sqlite_error)?;
    Ok(conn.last_insert_rowid())
}

pub fn set_status(conn: &Connection, file_id: FileId, status: &str) -> Result<(), StorageError> {
    let changed = conn
        .execute(
            "UPDATE uploaded_files SET status = ?1 WHERE file_id = ?2",
            params![status, file_id],
        )
        .map_err(sqlite_error)?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "file",
            key: file_id.to_string(),
        });
    }
    Ok(())
}

pub fn get_file(conn: &Connection, file_id: FileId) -> Result<Option<FileRow>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {FILE_COLUMNS} FROM uploaded_files WHERE file_id = ?1"
    ))
    .map_err(sqlite_error)?
    .query_row(params![file_id], map_file)
    .optional()
    .map_err(sqlite_error)
}

pub fn get_file_by_name(conn: &Connection, file_name: &str) -> Result<Option<FileRow>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {FILE_COLUMNS} FROM uploaded_files WHERE file_name = ?1"
    ))
    .map_err(sqlite_error)?
    .query_row(params![file_name], map_file)
    .optional()
    .map_err(sqlite_error)
}

/// All files, newest upload first.
pub fn list_files(conn: &Connection, limit: usize) -> Result<Vec<FileRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {FILE_COLUMNS} FROM uploaded_files
             ORDER BY uploaded_at DESC, file_id DESC LIMIT ?1"
        ))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![limit as i64], map_file)
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

/// Files uploaded at or after `since`, newest first.
pub fn recent_files(conn: &Connection, since: i64, limit: usize) -> Result<Vec<FileRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {FILE_COLUMNS} FROM uploaded_files
             WHERE uploaded_at >= ?1
             ORDER BY uploaded_at DESC, file_id DESC LIMIT ?2"
        ))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![since, limit as i64], map_file)
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

pub fn file_counts(conn: &Connection, file_id: FileId) -> Result<FileCounts, StorageError> {
    conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM respondents WHERE file_id = ?1),
            (SELECT COUNT(*) FROM oci_responses WHERE file_id = ?1),
            (SELECT COUNT(*) FROM cgs_responses WHERE file_id = ?1),
            (SELECT COUNT(*) FROM narratives WHERE file_id = ?1)",
        params![file_id],
        |row| {
            Ok(FileCounts {
                respondents: row.get(0)?,
                oci_responses: row.get(1)?,
                cgs_responses: row.get(2)?,
                narratives: row.get(3)?,
            })
        },
    )
    .map_err(sqlite_error)
}

/// Delete a file; foreign keys cascade to everything loaded from it.
/// Returns false when no such file exists.
pub fn delete_file(conn: &Connection, file_id: FileId) -> Result<bool, StorageError> {
    let deleted = conn
        .execute("DELETE FROM uploaded_files WHERE file_id = ?1", params![file_id])
        .map_err(sqlite_error)?;
    Ok(deleted > 0)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM uploaded_files", [], |row| row.get(0))
        .map_err(sqlite_error)
}
