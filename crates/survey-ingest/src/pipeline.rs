//! The upload pipeline: read, parse, then load in one transaction.

use std::time::Instant;

use serde::Serialize;
use survey_core::config::IngestConfig;
use survey_core::errors::{IngestError, StorageError, SurveyErrorCode};
use survey_core::events::types::{
    SheetLoadedEvent, UploadCompleteEvent, UploadFailedEvent, UploadStartedEvent,
};
use survey_core::events::EventDispatcher;
use survey_core::types::{FileId, Instrument};
use survey_storage::queries::files::{self, STATUS_COMPLETED};
use survey_storage::queries::{questions, respondents, responses};
use survey_storage::{now_secs, with_immediate_transaction, DatabaseManager};

use crate::parse::{parse_workbook, ParsedWorkbook};
use crate::source::WorkbookSource;
use crate::workbook::{read_workbook, RESPONDENT_SHEET};

/// Rows written for one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub rows: usize,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub file_id: FileId,
    pub file_name: String,
    pub sheets: Vec<SheetReport>,
    pub duration_ms: u64,
}

impl IngestReport {
    /// Rows written for `sheet`, 0 when it was absent.
    pub fn rows_for(&self, sheet: &str) -> usize {
        self.sheets
            .iter()
            .find(|s| s.sheet == sheet)
            .map_or(0, |s| s.rows)
    }
}

/// Load one workbook as a new uploaded file.
///
/// Everything is written inside a single `BEGIN IMMEDIATE` transaction: the
/// file row, the catalog upserts, respondents and responses. Any failure
/// leaves the database untouched and is reported through
/// `on_upload_failed` as well as the returned error.
pub fn ingest(
    db: &DatabaseManager,
    file_name: &str,
    source: &mut dyn WorkbookSource,
    config: &IngestConfig,
    dispatcher: &EventDispatcher,
) -> Result<IngestReport, IngestError> {
    let file_name = file_name.trim();
    dispatcher.emit_upload_started(&UploadStartedEvent {
        file_name: file_name.to_string(),
    });

    let result = run(db, file_name, source, config);

    match &result {
        Ok(report) => {
            for sheet in &report.sheets {
                dispatcher.emit_sheet_loaded(&SheetLoadedEvent {
                    file_id: report.file_id,
                    sheet: sheet.sheet.clone(),
                    rows: sheet.rows,
                });
            }
            dispatcher.emit_upload_complete(&UploadCompleteEvent {
                file_id: report.file_id,
                file_name: report.file_name.clone(),
                respondents: report.rows_for(RESPONDENT_SHEET),
                oci_responses: report.rows_for(Instrument::Oci.response_sheet()),
                cgs_responses: report.rows_for(Instrument::Cgs.response_sheet()),
                duration_ms: report.duration_ms,
            });
            tracing::info!(
                file_id = report.file_id,
                file_name = %report.file_name,
                ingest_duration_ms = report.duration_ms,
                "upload complete"
            );
        }
        Err(e) => {
            dispatcher.emit_upload_failed(&UploadFailedEvent {
                file_name: file_name.to_string(),
                error_code: e.error_code().to_string(),
                message: e.to_string(),
            });
            tracing::warn!(file_name, error = %e, "upload failed");
        }
    }

    result
}

fn run(
    db: &DatabaseManager,
    file_name: &str,
    source: &mut dyn WorkbookSource,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    let start = Instant::now();
    if file_name.is_empty() {
        return Err(IngestError::EmptyFileName);
    }
    if db
        .with_reader(|conn| files::get_file_by_name(conn, file_name))?
        .is_some()
    {
        return Err(IngestError::DuplicateFileName {
            name: file_name.to_string(),
        });
    }

    // Parse fully before opening the write transaction.
    let workbook = read_workbook(source)?;
    let parsed = parse_workbook(&workbook, config)?;
    if parsed.is_empty() {
        tracing::warn!(file_name, "workbook contains none of the known sheets");
    }

    let now = now_secs();
    let (file_id, sheets) = db
        .with_writer(|conn| with_immediate_transaction(conn, |tx| write_parsed(tx, file_name, &parsed, now)))
        .map_err(|e| duplicate_or(e, file_name))?;

    Ok(IngestReport {
        file_id,
        file_name: file_name.to_string(),
        sheets,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// A unique-name violation that slipped past the pre-check (a concurrent
/// upload of the same name) is still reported as a duplicate.
fn duplicate_or(e: StorageError, file_name: &str) -> IngestError {
    match &e {
        StorageError::ConstraintViolation { message } if message.contains("uploaded_files.file_name") => {
            IngestError::DuplicateFileName {
                name: file_name.to_string(),
            }
        }
        _ => IngestError::Storage(e),
    }
}

fn write_parsed(
    conn: &rusqlite::Connection,
    file_name: &str,
    parsed: &ParsedWorkbook,
    now: i64,
) -> Result<(FileId, Vec<SheetReport>), StorageError> {
    let file_id = files::insert_file(conn, file_name, now)?;
    let mut sheets = Vec::new();

    for instrument in Instrument::ALL {
        if let Some(rows) = parsed.questions(instrument) {
            for q in rows {
                questions::upsert_question(conn, instrument, q, now)?;
            }
            sheets.push(loaded(instrument.question_sheet(), rows.len(), file_id));
        }
    }

    if let Some(rows) = &parsed.respondents {
        for r in rows {
            respondents::insert_respondent(conn, file_id, r, now)?;
        }
        sheets.push(loaded(RESPONDENT_SHEET, rows.len(), file_id));
    }

    for instrument in Instrument::ALL {
        if let Some(rows) = parsed.responses(instrument) {
            for r in rows {
                responses::insert_response(conn, instrument, file_id, r, now)?;
            }
            sheets.push(loaded(instrument.response_sheet(), rows.len(), file_id));
        }
    }

    files::set_status(conn, file_id, STATUS_COMPLETED)?;
    Ok((file_id, sheets))
}

fn loaded(sheet: &str, rows: usize, file_id: FileId) -> SheetReport {
    tracing::debug!(file_id, sheet, rows, "sheet written");
    SheetReport {
        sheet: sheet.to_string(),
        rows,
    }
}
