//! Normalization of sheet cells into typed rows.

use std::collections::HashSet;

use survey_core::config::IngestConfig;
use survey_core::constants::infer_oci_category;
use survey_core::errors::IngestError;
use survey_core::types::Instrument;
use survey_storage::queries::questions::QuestionRow;
use survey_storage::queries::respondents::RespondentRow;
use survey_storage::queries::responses::ResponseRow;

use crate::workbook::{CellValue, SheetTable, Workbook, RESPONDENT_SHEET};

const QUESTION_COLUMNS: [&str; 3] = ["survey_id", "question_category", "question_text"];

const RESPONDENT_REQUIRED: [&str; 6] = [
    "respondent_id",
    "department",
    "gender",
    "age_group",
    "education_level",
    "major",
];

const RESPONDENT_OPTIONAL: [&str; 5] = [
    "experience_innovation",
    "experience_total",
    "certifications",
    "programming_skills",
    "comments",
];

const RESPONSE_REQUIRED: [&str; 3] = ["respondent_id", "survey_id", "response"];

/// Typed contents of a workbook. `None` means the sheet was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedWorkbook {
    pub oci_questions: Option<Vec<QuestionRow>>,
    pub cgs_questions: Option<Vec<QuestionRow>>,
    pub respondents: Option<Vec<RespondentRow>>,
    pub oci_responses: Option<Vec<ResponseRow>>,
    pub cgs_responses: Option<Vec<ResponseRow>>,
}

impl ParsedWorkbook {
    pub fn questions(&self, instrument: Instrument) -> Option<&[QuestionRow]> {
        match instrument {
            Instrument::Oci => self.oci_questions.as_deref(),
            Instrument::Cgs => self.cgs_questions.as_deref(),
        }
    }

    pub fn responses(&self, instrument: Instrument) -> Option<&[ResponseRow]> {
        match instrument {
            Instrument::Oci => self.oci_responses.as_deref(),
            Instrument::Cgs => self.cgs_responses.as_deref(),
        }
    }

    /// True when no known sheet was present.
    pub fn is_empty(&self) -> bool {
        self.oci_questions.is_none()
            && self.cgs_questions.is_none()
            && self.respondents.is_none()
            && self.oci_responses.is_none()
            && self.cgs_responses.is_none()
    }
}

/// Header name to column index for one sheet.
struct Columns<'a> {
    sheet: &'a SheetTable,
}

impl<'a> Columns<'a> {
    fn new(sheet: &'a SheetTable) -> Self {
        Self { sheet }
    }

    fn required(&self, column: &str) -> Result<usize, IngestError> {
        self.sheet
            .column_index(column)
            .ok_or_else(|| IngestError::MissingColumn {
                sheet: self.sheet.name.clone(),
                column: column.to_string(),
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        self.sheet.column_index(column)
    }
}

fn cell(row: &[CellValue], idx: Option<usize>) -> Option<&CellValue> {
    idx.and_then(|i| row.get(i))
}

fn text(row: &[CellValue], idx: Option<usize>) -> Option<String> {
    cell(row, idx).and_then(CellValue::as_text)
}

/// Data rows with their 1-based sheet row number (header is row 1).
/// Fully blank rows are dropped.
fn data_rows(sheet: &SheetTable) -> impl Iterator<Item = (usize, &[CellValue])> {
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (i + 2, r.as_slice()))
        .filter(|(_, r)| !r.iter().all(CellValue::is_empty))
}

fn required_text(
    sheet: &SheetTable,
    row_no: usize,
    row: &[CellValue],
    idx: usize,
    column: &str,
) -> Result<String, IngestError> {
    text(row, Some(idx)).ok_or_else(|| IngestError::InvalidRow {
        sheet: sheet.name.clone(),
        row: row_no,
        message: format!("'{column}' is blank"),
    })
}

/// Normalize every known sheet of `workbook`.
pub fn parse_workbook(workbook: &Workbook, config: &IngestConfig) -> Result<ParsedWorkbook, IngestError> {
    let mut parsed = ParsedWorkbook::default();

    for instrument in Instrument::ALL {
        if let Some(sheet) = workbook.sheet(instrument.question_sheet()) {
            let rows = parse_questions(sheet, instrument, config)?;
            match instrument {
                Instrument::Oci => parsed.oci_questions = Some(rows),
                Instrument::Cgs => parsed.cgs_questions = Some(rows),
            }
        }
    }

    if let Some(sheet) = workbook.sheet(RESPONDENT_SHEET) {
        parsed.respondents = Some(parse_respondents(sheet)?);
    }

    for instrument in Instrument::ALL {
        if let Some(sheet) = workbook.sheet(instrument.response_sheet()) {
            let rows = parse_responses(sheet, instrument, config)?;
            match instrument {
                Instrument::Oci => parsed.oci_responses = Some(rows),
                Instrument::Cgs => parsed.cgs_responses = Some(rows),
            }
        }
    }

    Ok(parsed)
}

fn parse_questions(
    sheet: &SheetTable,
    instrument: Instrument,
    config: &IngestConfig,
) -> Result<Vec<QuestionRow>, IngestError> {
    let cols = Columns::new(sheet);
    let [id_col, category_col, text_col] = [
        cols.required(QUESTION_COLUMNS[0])?,
        cols.required(QUESTION_COLUMNS[1])?,
        cols.required(QUESTION_COLUMNS[2])?,
    ];
    let infer = instrument == Instrument::Oci && config.effective_infer_oci_categories();

    data_rows(sheet)
        .map(|(row_no, row)| {
            let survey_id = required_text(sheet, row_no, row, id_col, QUESTION_COLUMNS[0])?;
            let question_category = text(row, Some(category_col))
                .or_else(|| infer.then(|| infer_oci_category(&survey_id)));
            Ok(QuestionRow {
                question_category,
                question_text: text(row, Some(text_col)),
                survey_id,
            })
        })
        .collect()
}

fn parse_respondents(sheet: &SheetTable) -> Result<Vec<RespondentRow>, IngestError> {
    let cols = Columns::new(sheet);
    let required = RESPONDENT_REQUIRED
        .iter()
        .map(|c| cols.required(c))
        .collect::<Result<Vec<_>, _>>()?;
    let optional: Vec<Option<usize>> = RESPONDENT_OPTIONAL.iter().map(|c| cols.optional(c)).collect();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (row_no, row) in data_rows(sheet) {
        let respondent_id = required_text(sheet, row_no, row, required[0], RESPONDENT_REQUIRED[0])?;
        if !seen.insert(respondent_id.clone()) {
            return Err(IngestError::DuplicateRespondent {
                sheet: sheet.name.clone(),
                respondent_id,
            });
        }
        out.push(RespondentRow {
            respondent_id,
            department: text(row, Some(required[1])),
            gender: text(row, Some(required[2])),
            age_group: text(row, Some(required[3])),
            education_level: text(row, Some(required[4])),
            major: text(row, Some(required[5])),
            experience_innovation: text(row, optional[0]),
            experience_total: text(row, optional[1]),
            certifications: text(row, optional[2]),
            programming_skills: text(row, optional[3]),
            comments: text(row, optional[4]),
        });
    }
    Ok(out)
}

fn parse_responses(
    sheet: &SheetTable,
    instrument: Instrument,
    config: &IngestConfig,
) -> Result<Vec<ResponseRow>, IngestError> {
    let cols = Columns::new(sheet);
    let respondent_col = cols.required(RESPONSE_REQUIRED[0])?;
    let survey_col = cols.required(RESPONSE_REQUIRED[1])?;
    let response_col = cols.required(RESPONSE_REQUIRED[2])?;
    let meaning_col = cols.optional("response_meaning");
    let validate = config.effective_validate_scales();

    data_rows(sheet)
        .map(|(row_no, row)| {
            let respondent_id =
                required_text(sheet, row_no, row, respondent_col, RESPONSE_REQUIRED[0])?;
            let survey_id = required_text(sheet, row_no, row, survey_col, RESPONSE_REQUIRED[1])?;
            let raw = cell(row, Some(response_col)).unwrap_or(&CellValue::Empty);
            let response = raw.as_integer().ok_or_else(|| IngestError::InvalidRow {
                sheet: sheet.name.clone(),
                row: row_no,
                message: format!(
                    "response '{}' is not an integer",
                    raw.as_text().unwrap_or_default()
                ),
            })?;
            if validate && !instrument.contains(response) {
                return Err(IngestError::ResponseOutOfScale {
                    sheet: sheet.name.clone(),
                    row: row_no,
                    value: response,
                    max: instrument.scale_max(),
                });
            }
            let response_meaning = text(row, meaning_col)
                .or_else(|| instrument.response_meaning(response).map(str::to_string));
            Ok(ResponseRow {
                respondent_id,
                survey_id,
                response,
                response_meaning,
            })
        })
        .collect()
}
