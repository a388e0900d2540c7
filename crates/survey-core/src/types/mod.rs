//! Domain types shared across the workspace.

pub mod analysis_key;
pub mod dimension;
pub mod instrument;

pub use analysis_key::{AnalysisKey, AnalysisType};
pub use dimension::Dimension;
pub use instrument::Instrument;

/// Identifier of an uploaded workbook (`uploaded_files.file_id`).
pub type FileId = i64;
