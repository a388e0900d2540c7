//! Queries for `oci_responses` / `cgs_responses`.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use survey_core::errors::StorageError;
use survey_core::types::{FileId, Instrument};

use super::util::sqlite_error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub respondent_id: String,
    pub survey_id: String,
    pub response: i64,
    pub response_meaning: Option<String>,
}

pub fn insert_response(
    conn: &Connection,
    instrument: Instrument,
    file_id: FileId,
    r: &ResponseRow,
    created_at: i64,
) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} (file_id, respondent_id, survey_id, response, response_meaning, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        instrument.responses_table()
    );
    conn.prepare_cached(&sql)
        .map_err(sqlite_error)?
        .execute(params![
            file_id,
            r.respondent_id,
            r.survey_id,
            r.response,
            r.response_meaning,
            created_at
        ])
        .map_err(sqlite_error)?;
    Ok(())
}

/// First `limit` responses of a file in insertion order.
pub fn list_responses(
    conn: &Connection,
    instrument: Instrument,
    file_id: FileId,
    limit: usize,
) -> Result<Vec<ResponseRow>, StorageError> {
    let sql = format!(
        "SELECT respondent_id, survey_id, response, response_meaning FROM {}
         WHERE file_id = ?1 ORDER BY response_id LIMIT ?2",
        instrument.responses_table()
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![file_id, limit as i64], |row| {
            Ok(ResponseRow {
                respondent_id: row.get(0)?,
                survey_id: row.get(1)?,
                response: row.get(2)?,
                response_meaning: row.get(3)?,
            })
        })
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

pub fn count_for_file(
    conn: &Connection,
    instrument: Instrument,
    file_id: FileId,
) -> Result<i64, StorageError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE file_id = ?1",
        instrument.responses_table()
    );
    conn.query_row(&sql, params![file_id], |row| row.get(0))
        .map_err(sqlite_error)
}
