//! # survey-ingest
//!
//! Turns an uploaded workbook into rows in the survey database:
//! [`read_workbook`] pulls the known sheets out of a [`WorkbookSource`],
//! [`parse_workbook`] normalizes them into typed rows, and [`ingest`] writes
//! everything for one file inside a single transaction.

pub mod parse;
pub mod pipeline;
pub mod source;
pub mod workbook;

pub use parse::{parse_workbook, ParsedWorkbook};
pub use pipeline::{ingest, IngestReport, SheetReport};
pub use source::{CalamineSource, MemorySource, WorkbookSource};
pub use workbook::{read_workbook, CellValue, SheetTable, Workbook, KNOWN_SHEETS};
