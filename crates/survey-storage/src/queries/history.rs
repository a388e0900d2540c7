//! Queries for `narrative_history`, an append-only log of generated text.

use rusqlite::{params, Connection};
use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::types::FileId;

use super::util::sqlite_error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub history_id: i64,
    pub file_id: FileId,
    pub analysis_type: String,
    pub analysis_item: String,
    pub analysis_text: String,
    pub model: Option<String>,
    pub created_at: i64,
}

/// Append one generated narrative. Returns the new row id.
pub fn append(
    conn: &Connection,
    file_id: FileId,
    analysis_type: &str,
    analysis_item: &str,
    text: &str,
    model: Option<&str>,
    created_at: i64,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO narrative_history
            (file_id, analysis_type, analysis_item, analysis_text, model, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .map_err(sqlite_error)?
    .execute(params![file_id, analysis_type, analysis_item, text, model, created_at])
    .map_err(sqlite_error)?;
    Ok(conn.last_insert_rowid())
}

/// Latest entries across all files, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<HistoryRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT history_id, file_id, analysis_type, analysis_item, analysis_text,
                    model, created_at
             FROM narrative_history
             ORDER BY created_at DESC, history_id DESC LIMIT ?1",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(HistoryRow {
                history_id: row.get(0)?,
                file_id: row.get(1)?,
                analysis_type: row.get(2)?,
                analysis_item: row.get(3)?,
                analysis_text: row.get(4)?,
                model: row.get(5)?,
                created_at: row.get(6)?,
            })
        })
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM narrative_history", [], |row| row.get(0))
        .map_err(sqlite_error)
}
