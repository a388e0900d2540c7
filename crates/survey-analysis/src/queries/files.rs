//! Uploaded-file listing and previews.

use rusqlite::Connection;
use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::types::{FileId, Instrument};
use survey_storage::queries::files::{self, FileCounts, FileRow};
use survey_storage::queries::respondents::{self, RespondentRow};
use survey_storage::queries::responses::{self, ResponseRow};

/// A file's metadata, row counts, and the first rows of each table.
#[derive(Debug, Clone, Serialize)]
pub struct FileDetails {
    pub file: FileRow,
    pub counts: FileCounts,
    pub respondents: Vec<RespondentRow>,
    pub oci_responses: Vec<ResponseRow>,
    pub cgs_responses: Vec<ResponseRow>,
}

/// `None` when the file does not exist.
pub fn file_details(
    conn: &Connection,
    file_id: FileId,
    max_rows: usize,
) -> Result<Option<FileDetails>, StorageError> {
    let Some(file) = files::get_file(conn, file_id)? else {
        return Ok(None);
    };
    Ok(Some(FileDetails {
        counts: files::file_counts(conn, file_id)?,
        respondents: respondents::list_respondents(conn, file_id, max_rows)?,
        oci_responses: responses::list_responses(conn, Instrument::Oci, file_id, max_rows)?,
        cgs_responses: responses::list_responses(conn, Instrument::Cgs, file_id, max_rows)?,
        file,
    }))
}
