//! A small two-department survey loaded into an in-memory database.

#![allow(dead_code)]

use survey_core::config::IngestConfig;
use survey_core::events::EventDispatcher;
use survey_core::types::FileId;
use survey_ingest::{ingest, CellValue, MemorySource};
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

/// IT: R1-R3, HR: R4-R5.
///
/// OCI "Power" = OCI_01 + OCI_02, "Achievement" = OCI_03.
/// CGS "Board" = CGS_01 + CGS_02, "Disclosure" = CGS_03.
pub fn survey_workbook() -> MemorySource {
    MemorySource::new()
        .with_sheet(
            "OCI_Q",
            vec![
                row(&["survey_id", "question_category", "question_text"]),
                row(&["OCI_01", "Power", "Managers decide alone"]),
                row(&["OCI_02", "Power", "Rank matters"]),
                row(&["OCI_03", "Achievement", "Goals are ambitious"]),
            ],
        )
        .with_sheet(
            "CGS_Q",
            vec![
                row(&["survey_id", "question_category", "question_text"]),
                row(&["CGS_01", "Board", "The board is independent"]),
                row(&["CGS_02", "Board", "The board meets often"]),
                row(&["CGS_03", "Disclosure", "Reports are timely"]),
            ],
        )
        .with_sheet(
            "Respondent",
            vec![
                row(&[
                    "respondent_id", "department", "gender", "age_group", "education_level", "major",
                    "experience_total", "certifications",
                ]),
                row(&["R1", "IT", "M", "30s", "대졸", "CS", "5-10", "PMP"]),
                row(&["R2", "IT", "F", "20s", "석사", "CS", "0-5", "CISA"]),
                row(&["R3", "IT", "M", "30s", "대졸", "EE", "5-10", ""]),
                row(&["R4", "HR", "F", "40s", "박사", "Business", "10+", "PMP"]),
                row(&["R5", "HR", "F", "20s", "고졸", "Business", "0-5", ""]),
            ],
        )
        .with_sheet(
            "OCI_R",
            answers(&[
                ("R1", "OCI_01", 5), ("R1", "OCI_02", 4), ("R1", "OCI_03", 3),
                ("R2", "OCI_01", 4), ("R2", "OCI_02", 4), ("R2", "OCI_03", 2),
                ("R3", "OCI_01", 5), ("R3", "OCI_02", 5), ("R3", "OCI_03", 1),
                ("R4", "OCI_01", 2), ("R4", "OCI_02", 1), ("R4", "OCI_03", 4),
                ("R5", "OCI_01", 1), ("R5", "OCI_02", 2), ("R5", "OCI_03", 5),
            ]),
        )
        .with_sheet(
            "CGS_R",
            answers(&[
                ("R1", "CGS_01", 7), ("R1", "CGS_02", 6), ("R1", "CGS_03", 5),
                ("R2", "CGS_01", 6), ("R2", "CGS_02", 7),
                ("R3", "CGS_01", 7),
                ("R4", "CGS_01", 2),
                ("R5", "CGS_01", 1),
            ]),
        )
}

pub fn setup_db() -> DatabaseManager {
    DatabaseManager::open_in_memory().unwrap()
}

pub fn load(db: &DatabaseManager, name: &str, mut source: MemorySource) -> FileId {
    ingest(
        db,
        name,
        &mut source,
        &IngestConfig::default(),
        &EventDispatcher::new(),
    )
    .unwrap()
    .file_id
}

/// A database holding the survey once, returning its file id.
pub fn loaded_db() -> (DatabaseManager, FileId) {
    let db = setup_db();
    let file_id = load(&db, "survey.xlsx", survey_workbook());
    (db, file_id)
}
