//! Workbook fixtures shared by the ingest tests.

#![allow(dead_code)]

use survey_ingest::{CellValue, MemorySource};

pub fn t(s: &str) -> CellValue {
    CellValue::from(s)
}

pub fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|c| t(c)).collect()
}

pub fn oci_questions() -> Vec<Vec<CellValue>> {
    vec![
        row(&["survey_id", "question_category", "question_text"]),
        row(&["OCI_01", "Power", "Managers decide alone"]),
        row(&["OCI_02", "Achievement", "Goals are ambitious"]),
        row(&["권력_03", "", "Authority matters"]),
    ]
}

pub fn cgs_questions() -> Vec<Vec<CellValue>> {
    vec![
        row(&["survey_id", "question_category", "question_text"]),
        row(&["CGS_01", "Board", "The board is independent"]),
        row(&["CGS_02", "Disclosure", "Reports are timely"]),
    ]
}

pub fn respondents() -> Vec<Vec<CellValue>> {
    vec![
        row(&[
            "respondent_id", "department", "gender", "age_group", "education_level", "major",
            "certifications",
        ]),
        vec![
            CellValue::Float(1001.0),
            t("IT"),
            t("M"),
            t("30s"),
            t("대졸"),
            t("CS"),
            t("PMP"),
        ],
        vec![
            CellValue::Int(1002),
            t("HR"),
            t("F"),
            t("20s"),
            t("석사"),
            t("Business"),
            CellValue::Empty,
        ],
    ]
}

pub fn oci_responses() -> Vec<Vec<CellValue>> {
    vec![
        row(&["respondent_id", "survey_id", "response", "response_meaning"]),
        vec![t("1001"), t("OCI_01"), CellValue::Int(4), t("Agree")],
        vec![t("1001"), t("OCI_02"), CellValue::Float(5.0), CellValue::Empty],
        vec![t("1002"), t("OCI_01"), t("2"), t("Disagree")],
    ]
}

pub fn cgs_responses() -> Vec<Vec<CellValue>> {
    vec![
        row(&["respondent_id", "survey_id", "response"]),
        vec![t("1001"), t("CGS_01"), CellValue::Int(7)],
        vec![t("1002"), t("CGS_02"), CellValue::Int(3)],
    ]
}

/// A complete, valid workbook.
pub fn full_workbook() -> MemorySource {
    MemorySource::new()
        .with_sheet("OCI_Q", oci_questions())
        .with_sheet("CGS_Q", cgs_questions())
        .with_sheet("Respondent", respondents())
        .with_sheet("OCI_R", oci_responses())
        .with_sheet("CGS_R", cgs_responses())
}
