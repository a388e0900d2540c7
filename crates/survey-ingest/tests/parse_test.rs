//! Reading and normalizing workbook sheets.

mod common;

use common::*;
use proptest::prelude::*;
use survey_core::config::IngestConfig;
use survey_core::errors::IngestError;
use survey_ingest::{parse_workbook, read_workbook, CellValue, MemorySource, KNOWN_SHEETS};

fn parse(source: &mut MemorySource) -> Result<survey_ingest::ParsedWorkbook, IngestError> {
    let workbook = read_workbook(source)?;
    parse_workbook(&workbook, &IngestConfig::default())
}

#[test]
fn reads_known_sheets_in_load_order() {
    let mut source = MemorySource::new()
        .with_sheet("cgs_r", cgs_responses())
        .with_sheet("Notes", vec![row(&["anything"])])
        .with_sheet("OCI_Q", oci_questions());
    let workbook = read_workbook(&mut source).unwrap();

    let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["OCI_Q", "CGS_R"]);
    assert_eq!(KNOWN_SHEETS[0], "OCI_Q");
}

#[test]
fn parses_full_workbook() {
    let parsed = parse(&mut full_workbook()).unwrap();

    let respondents = parsed.respondents.unwrap();
    assert_eq!(respondents.len(), 2);
    // Numeric ids lose the trailing ".0".
    assert_eq!(respondents[0].respondent_id, "1001");
    assert_eq!(respondents[1].respondent_id, "1002");
    assert_eq!(respondents[1].certifications, None);
    assert_eq!(respondents[0].comments, None);

    let oci = parsed.oci_responses.unwrap();
    assert_eq!(oci[1].response, 5);
    // Blank meaning filled from the scale.
    assert_eq!(oci[1].response_meaning.as_deref(), Some("Strongly agree"));
    assert_eq!(oci[2].response, 2);

    let cgs = parsed.cgs_responses.unwrap();
    assert_eq!(cgs[0].response_meaning.as_deref(), Some("Strongly agree"));
}

#[test]
fn blank_oci_category_is_inferred() {
    let parsed = parse(&mut full_workbook()).unwrap();
    let questions = parsed.oci_questions.unwrap();
    assert_eq!(questions[2].question_category.as_deref(), Some("권력 (Power)"));

    let workbook = read_workbook(&mut full_workbook()).unwrap();
    let config = IngestConfig {
        infer_oci_categories: Some(false),
        ..Default::default()
    };
    let parsed = parse_workbook(&workbook, &config).unwrap();
    assert_eq!(parsed.oci_questions.unwrap()[2].question_category, None);
}

#[test]
fn missing_required_column_fails() {
    let mut source = MemorySource::new().with_sheet(
        "Respondent",
        vec![
            row(&["respondent_id", "department", "gender", "age_group", "major"]),
            row(&["1", "IT", "M", "30s", "CS"]),
        ],
    );
    match parse(&mut source) {
        Err(IngestError::MissingColumn { sheet, column }) => {
            assert_eq!(sheet, "Respondent");
            assert_eq!(column, "education_level");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn headers_match_case_insensitively() {
    let mut source = MemorySource::new().with_sheet(
        "CGS_Q",
        vec![
            row(&[" Survey_ID ", "QUESTION_CATEGORY", "Question_Text"]),
            row(&["C1", "Board", "text"]),
        ],
    );
    let parsed = parse(&mut source).unwrap();
    assert_eq!(parsed.cgs_questions.unwrap()[0].survey_id, "C1");
}

#[test]
fn duplicate_respondent_fails() {
    let mut rows = respondents();
    rows.push(vec![
        t("1001"),
        t("Ops"),
        t("F"),
        t("40s"),
        t("박사"),
        t("Math"),
        CellValue::Empty,
    ]);
    let mut source = MemorySource::new().with_sheet("Respondent", rows);
    assert!(matches!(
        parse(&mut source),
        Err(IngestError::DuplicateRespondent { respondent_id, .. }) if respondent_id == "1001"
    ));
}

#[test]
fn out_of_scale_response_fails_unless_disabled() {
    let rows = vec![
        row(&["respondent_id", "survey_id", "response"]),
        vec![t("1"), t("OCI_01"), CellValue::Int(6)],
    ];
    let mut source = MemorySource::new().with_sheet("OCI_R", rows.clone());
    match parse(&mut source) {
        Err(IngestError::ResponseOutOfScale { row, value, max, .. }) => {
            assert_eq!((row, value, max), (2, 6, 5));
        }
        other => panic!("expected ResponseOutOfScale, got {other:?}"),
    }

    let workbook = read_workbook(&mut MemorySource::new().with_sheet("OCI_R", rows)).unwrap();
    let lenient = IngestConfig {
        validate_scales: Some(false),
        ..Default::default()
    };
    let parsed = parse_workbook(&workbook, &lenient).unwrap();
    assert_eq!(parsed.oci_responses.unwrap()[0].response, 6);
}

#[test]
fn non_integer_response_fails() {
    let mut source = MemorySource::new().with_sheet(
        "CGS_R",
        vec![
            row(&["respondent_id", "survey_id", "response"]),
            vec![t("1"), t("CGS_01"), CellValue::Float(4.5)],
        ],
    );
    assert!(matches!(
        parse(&mut source),
        Err(IngestError::InvalidRow { row: 2, .. })
    ));
}

#[test]
fn blank_rows_are_skipped_and_blank_ids_rejected() {
    let mut source = MemorySource::new().with_sheet(
        "OCI_Q",
        vec![
            row(&["survey_id", "question_category", "question_text"]),
            row(&["", " ", ""]),
            row(&["Q1", "Power", "x"]),
        ],
    );
    assert_eq!(parse(&mut source).unwrap().oci_questions.unwrap().len(), 1);

    let mut source = MemorySource::new().with_sheet(
        "OCI_Q",
        vec![
            row(&["survey_id", "question_category", "question_text"]),
            row(&["", "Power", "x"]),
        ],
    );
    assert!(matches!(
        parse(&mut source),
        Err(IngestError::InvalidRow { row: 2, .. })
    ));
}

#[test]
fn empty_workbook_parses_to_nothing() {
    let parsed = parse(&mut MemorySource::new()).unwrap();
    assert!(parsed.is_empty());
}

proptest! {
    #[test]
    fn integral_floats_render_without_fraction(n in -1_000_000_000i64..1_000_000_000) {
        let cell = CellValue::Float(n as f64);
        prop_assert_eq!(cell.as_text(), Some(n.to_string()));
        prop_assert_eq!(cell.as_integer(), Some(n));
    }

    #[test]
    fn text_cells_are_trimmed(s in "[a-zA-Z0-9]{1,12}", pad in " {0,3}") {
        let cell = CellValue::Text(format!("{pad}{s}{pad}"));
        prop_assert_eq!(cell.as_text(), Some(s));
    }
}
