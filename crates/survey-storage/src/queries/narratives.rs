//! Queries for `narratives`: current text per (file, type, item).

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::types::FileId;

use super::util::sqlite_error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeRow {
    pub file_id: FileId,
    pub analysis_type: String,
    pub analysis_item: String,
    pub analysis_text: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

const NARRATIVE_COLUMNS: &str =
    "file_id, analysis_type, analysis_item, analysis_text, created_at, updated_at";

fn map_narrative(row: &Row<'_>) -> rusqlite::Result<NarrativeRow> {
    Ok(NarrativeRow {
        file_id: row.get(0)?,
        analysis_type: row.get(1)?,
        analysis_item: row.get(2)?,
        analysis_text: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn get_narrative(
    conn: &Connection,
    file_id: FileId,
    analysis_type: &str,
    analysis_item: &str,
) -> Result<Option<NarrativeRow>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {NARRATIVE_COLUMNS} FROM narratives
         WHERE file_id = ?1 AND analysis_type = ?2 AND analysis_item = ?3"
    ))
    .map_err(sqlite_error)?
    .query_row(params![file_id, analysis_type, analysis_item], map_narrative)
    .optional()
    .map_err(sqlite_error)
}

/// Insert, or replace the text of an existing slot. `created_at` is kept
/// on update and `updated_at` is set.
pub fn upsert_narrative(
    conn: &Connection,
    file_id: FileId,
    analysis_type: &str,
    analysis_item: &str,
    text: &str,
    now: i64,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO narratives
            (file_id, analysis_type, analysis_item, analysis_text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(file_id, analysis_type, analysis_item) DO UPDATE SET
            analysis_text = excluded.analysis_text,
            updated_at = excluded.created_at",
    )
    .map_err(sqlite_error)?
    .execute(params![file_id, analysis_type, analysis_item, text, now])
    .map_err(sqlite_error)?;
    Ok(())
}

/// Every narrative of a file, most recently touched first.
pub fn list_for_file(conn: &Connection, file_id: FileId) -> Result<Vec<NarrativeRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {NARRATIVE_COLUMNS} FROM narratives WHERE file_id = ?1
             ORDER BY COALESCE(updated_at, created_at) DESC, narrative_id DESC"
        ))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![file_id], map_narrative)
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

/// Returns false when the slot was already empty.
pub fn delete_narrative(
    conn: &Connection,
    file_id: FileId,
    analysis_type: &str,
    analysis_item: &str,
) -> Result<bool, StorageError> {
    let deleted = conn
        .execute(
            "DELETE FROM narratives
             WHERE file_id = ?1 AND analysis_type = ?2 AND analysis_item = ?3",
            params![file_id, analysis_type, analysis_item],
        )
        .map_err(sqlite_error)?;
    Ok(deleted > 0)
}
