//! Queries for `respondents`.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use survey_core::errors::StorageError;
use survey_core::types::FileId;

use super::util::sqlite_error;

/// One respondent. Every descriptive column is optional in the workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentRow {
    pub respondent_id: String,
    pub department: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub education_level: Option<String>,
    pub major: Option<String>,
    pub experience_innovation: Option<String>,
    pub experience_total: Option<String>,
    pub certifications: Option<String>,
    pub programming_skills: Option<String>,
    pub comments: Option<String>,
}

pub fn insert_respondent(
    conn: &Connection,
    file_id: FileId,
    r: &RespondentRow,
    created_at: i64,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO respondents (
                respondent_id, file_id, department, gender, age_group, education_level,
                major, experience_innovation, experience_total, certifications,
                programming_skills, comments, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .map_err(sqlite_error)?;
    stmt.execute(params![
        r.respondent_id,
        file_id,
        r.department,
        r.gender,
        r.age_group,
        r.education_level,
        r.major,
        r.experience_innovation,
        r.experience_total,
        r.certifications,
        r.programming_skills,
        r.comments,
        created_at,
    ])
    .map_err(sqlite_error)?;
    Ok(())
}

/// First `limit` respondents of a file in id order.
pub fn list_respondents(
    conn: &Connection,
    file_id: FileId,
    limit: usize,
) -> Result<Vec<RespondentRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT respondent_id, department, gender, age_group, education_level, major,
                    experience_innovation, experience_total, certifications,
                    programming_skills, comments
             FROM respondents WHERE file_id = ?1
             ORDER BY respondent_id LIMIT ?2",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![file_id, limit as i64], |row| {
            Ok(RespondentRow {
                respondent_id: row.get(0)?,
                department: row.get(1)?,
                gender: row.get(2)?,
                age_group: row.get(3)?,
                education_level: row.get(4)?,
                major: row.get(5)?,
                experience_innovation: row.get(6)?,
                experience_total: row.get(7)?,
                certifications: row.get(8)?,
                programming_skills: row.get(9)?,
                comments: row.get(10)?,
            })
        })
        .map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}

pub fn count_for_file(conn: &Connection, file_id: FileId) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM respondents WHERE file_id = ?1",
        params![file_id],
        |row| row.get(0),
    )
    .map_err(sqlite_error)
}
