//! Workbooks assembled in memory.

use survey_core::errors::IngestError;

use super::WorkbookSource;
use crate::workbook::CellValue;

/// A workbook held as plain rows. Used by tests and by callers that
/// already have the cells (e.g. a CSV export per sheet).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: Vec<(String, Vec<Vec<CellValue>>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose first row is the header.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        self.sheets.push((name.into(), rows));
        self
    }
}

impl WorkbookSource for MemorySource {
    fn sheet_names(&mut self) -> Result<Vec<String>, IngestError> {
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>, IngestError> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| IngestError::SheetRead {
                sheet: sheet.to_string(),
                message: "no such sheet".to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("in-memory workbook ({} sheets)", self.sheets.len())
    }
}
