#![allow(dead_code)]

use std::path::Path;

use clap::Parser;
use survey_cli::Cli;
use survey_core::config::IngestConfig;
use survey_core::errors::CompletionError;
use survey_core::events::EventDispatcher;
use survey_core::types::FileId;
use survey_ingest::{ingest, CellValue, MemorySource};
use survey_narrative::{CompletionRequest, TextCompletion};
use survey_storage::DatabaseManager;
use tempfile::TempDir;

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

fn workbook() -> MemorySource {
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
                row(&["R1", "Finance", "F", "30s", "대졸", "Accounting"]),
                row(&["R2", "Finance", "M", "40s", "석사", "Accounting"]),
                row(&["R3", "Legal", "F", "30s", "박사", "Law"]),
            ],
        )
        .with_sheet(
            "OCI_R",
            answers(&[("R1", "OCI_01", 4), ("R2", "OCI_01", 5), ("R3", "OCI_01", 2)]),
        )
        .with_sheet(
            "CGS_R",
            answers(&[("R1", "CGS_01", 6), ("R2", "CGS_01", 5), ("R3", "CGS_01", 3)]),
        )
}

/// A project root whose default database already holds one upload.
pub fn project() -> (TempDir, FileId) {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open(&dir.path().join("survey.db")).unwrap();
    let mut source = workbook();
    let file_id = ingest(&db, "survey.xlsx", &mut source, &IngestConfig::default(), &EventDispatcher::new())
        .unwrap()
        .file_id;
    (dir, file_id)
}

/// Run `surveyctl` rooted at `root`, returning stdout.
pub fn run(root: &Path, args: &[&str]) -> anyhow::Result<String> {
    run_with(root, args, None)
}

pub fn run_with(root: &Path, args: &[&str], completion: Option<&dyn TextCompletion>) -> anyhow::Result<String> {
    let root = root.to_string_lossy().into_owned();
    let mut argv = vec!["surveyctl", "--root", root.as_str()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    survey_cli::execute(cli, &mut out, completion)?;
    Ok(String::from_utf8(out)?)
}

pub struct CannedCompletion(pub &'static str);

impl TextCompletion for CannedCompletion {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
