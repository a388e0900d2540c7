//! In-memory view of the sheets a survey workbook carries.

use serde::Serialize;
use survey_core::errors::IngestError;

use crate::source::WorkbookSource;

/// Sheet holding respondent demographics.
pub const RESPONDENT_SHEET: &str = "Respondent";

/// Sheets read from a workbook, in load order: catalogs before the
/// responses that reference them.
pub const KNOWN_SHEETS: [&str; 5] = ["OCI_Q", "CGS_Q", RESPONDENT_SHEET, "OCI_R", "CGS_R"];

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form, `None` for blank cells. Integral floats lose
    /// their `.0` so numeric ids read as `"1001"`, not `"1001.0"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            Self::Bool(b) => Some(b.to_string()),
        }
    }

    /// Integer value for numeric cells and integer-looking text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Self::Text(s) => {
                let t = s.trim();
                t.parse::<i64>().ok().or_else(|| {
                    t.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.is_finite())
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// A sheet as a header row plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    /// Build from raw rows; the first row is the header. An empty sheet has
    /// no headers and no rows.
    pub fn from_rows(name: impl Into<String>, raw: Vec<Vec<CellValue>>) -> Self {
        let mut iter = raw.into_iter();
        let headers = iter
            .next()
            .map(|h| h.iter().map(|c| c.as_text().unwrap_or_default()).collect())
            .unwrap_or_default();
        Self {
            name: name.into(),
            headers,
            rows: iter.collect(),
        }
    }

    /// Index of a header, matched case-insensitively after trimming.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
    }
}

/// The known sheets found in one workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<SheetTable>,
}

impl Workbook {
    /// Sheet by canonical name, if the workbook had it.
    pub fn sheet(&self, name: &str) -> Option<&SheetTable> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Read every known sheet the source has. Sheet names match
/// case-insensitively; missing sheets are skipped.
pub fn read_workbook(source: &mut dyn WorkbookSource) -> Result<Workbook, IngestError> {
    let available = source.sheet_names()?;
    let mut workbook = Workbook::default();

    for canonical in KNOWN_SHEETS {
        let Some(actual) = available
            .iter()
            .find(|n| n.trim().eq_ignore_ascii_case(canonical))
        else {
            tracing::info!(sheet = canonical, source = %source.describe(), "sheet not present, skipping");
            continue;
        };
        let raw = source.read_sheet(actual)?;
        let table = SheetTable::from_rows(canonical, raw);
        tracing::debug!(sheet = canonical, rows = table.rows.len(), "sheet read");
        workbook.sheets.push(table);
    }

    Ok(workbook)
}
