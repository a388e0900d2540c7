//! Where workbook cells come from.

mod spreadsheet;
mod memory;

pub use self::spreadsheet::CalamineSource;
pub use self::memory::MemorySource;

use survey_core::errors::IngestError;

use crate::workbook::CellValue;

/// A spreadsheet that can list its sheets and hand back raw cell rows.
pub trait WorkbookSource {
    fn sheet_names(&mut self) -> Result<Vec<String>, IngestError>;

    /// All rows of `sheet`, header included.
    fn read_sheet(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>, IngestError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}
