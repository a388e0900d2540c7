//! xlsx/xls/ods workbooks on disk, read with calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use survey_core::errors::IngestError;

use super::WorkbookSource;
use crate::workbook::CellValue;

pub struct CalamineSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl CalamineSource {
    /// Open a workbook; the format is picked from the file extension.
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        let workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl WorkbookSource for CalamineSource {
    fn sheet_names(&mut self) -> Result<Vec<String>, IngestError> {
        Ok(self.workbook.sheet_names())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>, IngestError> {
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| IngestError::SheetRead {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(convert).collect())
            .collect())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn convert(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
