//! Queries for the `oci_questions` / `cgs_questions` catalogs.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use survey_core::errors::StorageError;
use survey_core::types::Instrument;

use super::util::sqlite_error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub survey_id: String,
    pub question_category: Option<String>,
    pub question_text: Option<String>,
}

/// Insert or replace the catalog entry for `survey_id`. The catalog is
/// shared by every file, so a later upload rewrites category and text.
pub fn upsert_question(
    conn: &Connection,
    instrument: Instrument,
    q: &QuestionRow,
    created_at: i64,
) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} (survey_id, question_category, question_text, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(survey_id) DO UPDATE SET
            question_category = excluded.question_category,
            question_text = excluded.question_text",
        instrument.questions_table()
    );
    conn.prepare_cached(&sql)
        .map_err(sqlite_error)?
        .execute(params![q.survey_id, q.question_category, q.question_text, created_at])
        .map_err(sqlite_error)?;
    Ok(())
}

pub fn get_question(
    conn: &Connection,
    instrument: Instrument,
    survey_id: &str,
) -> Result<Option<QuestionRow>, StorageError> {
    let sql = format!(
        "SELECT survey_id, question_category, question_text FROM {} WHERE survey_id = ?1",
        instrument.questions_table()
    );
    conn.prepare_cached(&sql)
        .map_err(sqlite_error)?
        .query_row(params![survey_id], |row| {
            Ok(QuestionRow {
                survey_id: row.get(0)?,
                question_category: row.get(1)?,
                question_text: row.get(2)?,
            })
        })
        .optional()
        .map_err(sqlite_error)
}

pub fn list_questions(conn: &Connection, instrument: Instrument) -> Result<Vec<QuestionRow>, StorageError> {
    let sql = format!(
        "SELECT survey_id, question_category, question_text FROM {} ORDER BY survey_id",
        instrument.questions_table()
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(QuestionRow {
                survey_id: row.get(0)?,
                question_category: row.get(1)?,
                question_text: row.get(2)?,
            })
        })
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

/// Distinct non-null categories, unordered beyond SQLite's text order.
pub fn distinct_categories(conn: &Connection, instrument: Instrument) -> Result<Vec<String>, StorageError> {
    let sql = format!(
        "SELECT DISTINCT question_category FROM {}
         WHERE question_category IS NOT NULL AND question_category <> ''
         ORDER BY question_category",
        instrument.questions_table()
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    let rows = stmt.query_map([], |row| row.get(0)).map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}
