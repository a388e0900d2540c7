//! Fixtures: a small loaded survey, a scripted completion client, and an
//! event recorder.

#![allow(dead_code)]

use std::sync::Mutex;

use survey_core::config::IngestConfig;
use survey_core::errors::CompletionError;
use survey_core::events::types::{NarrativeGeneratedEvent, NarrativeSavedEvent};
use survey_core::events::{EventDispatcher, SurveyEventHandler};
use survey_core::types::FileId;
use survey_ingest::{ingest, CellValue, MemorySource};
use survey_narrative::{CompletionRequest, TextCompletion};
use survey_storage::DatabaseManager;

fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

fn answers(rows: &[(&str, &str, i64)]) -> Vec<Vec<CellValue>> {
    let mut out = vec![row(&["respondent_id", "survey_id", "response"])];
    out.extend(
        rows.iter()
            .map(|(r, q, v)| vec![CellValue::from(*r), CellValue::from(*q), CellValue::from(*v)]),
    );
    out
}

/// Sales: S1-S3 (high Power), Ops: O1-O2 (low Power).
pub fn survey_workbook() -> MemorySource {
    MemorySource::new()
        .with_sheet(
            "OCI_Q",
            vec![
                row(&["survey_id", "question_category", "question_text"]),
                row(&["OCI_01", "Power", "Managers decide alone"]),
            ],
        )
        .with_sheet(
            "CGS_Q",
            vec![
                row(&["survey_id", "question_category", "question_text"]),
                row(&["CGS_01", "Board", "The board is independent"]),
            ],
        )
        .with_sheet(
            "Respondent",
            vec![
                row(&["respondent_id", "department", "gender", "age_group", "education_level", "major"]),
                row(&["S1", "Sales", "M", "30s", "대졸", "Business"]),
                row(&["S2", "Sales", "F", "20s", "대졸", "Business"]),
                row(&["S3", "Sales", "F", "30s", "석사", "Economics"]),
                row(&["O1", "Ops", "M", "40s", "고졸", "Engineering"]),
                row(&["O2", "Ops", "M", "50s", "대졸", "Engineering"]),
            ],
        )
        .with_sheet(
            "OCI_R",
            answers(&[
                ("S1", "OCI_01", 5),
                ("S2", "OCI_01", 5),
                ("S3", "OCI_01", 4),
                ("O1", "OCI_01", 1),
                ("O2", "OCI_01", 2),
            ]),
        )
        .with_sheet(
            "CGS_R",
            answers(&[("S1", "CGS_01", 7), ("S2", "CGS_01", 6), ("S3", "CGS_01", 7)]),
        )
}

pub fn setup_db() -> DatabaseManager {
    DatabaseManager::open_in_memory().unwrap()
}

pub fn loaded_db() -> (DatabaseManager, FileId) {
    let db = setup_db();
    let mut source = survey_workbook();
    let file_id = ingest(
        &db,
        "survey.xlsx",
        &mut source,
        &IngestConfig::default(),
        &EventDispatcher::new(),
    )
    .unwrap()
    .file_id;
    (db, file_id)
}

/// Returns scripted replies in order and records every request.
pub struct FakeCompletion {
    replies: Mutex<Vec<Result<String, CompletionError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(reply: &str) -> Self {
        Self::replying(vec![Ok(reply.to_string())])
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl TextCompletion for FakeCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Err(CompletionError::EmptyCompletion)
        } else {
            replies.remove(0)
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
pub struct Recorder {
    pub saved: Mutex<Vec<NarrativeSavedEvent>>,
    pub generated: Mutex<Vec<NarrativeGeneratedEvent>>,
}

impl SurveyEventHandler for Recorder {
    fn on_narrative_saved(&self, event: &NarrativeSavedEvent) {
        self.saved.lock().unwrap().push(event.clone());
    }

    fn on_narrative_generated(&self, event: &NarrativeGeneratedEvent) {
        self.generated.lock().unwrap().push(event.clone());
    }
}
