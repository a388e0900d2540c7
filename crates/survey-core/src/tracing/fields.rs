//! Structured field names shared by spans and events across the workspace.
//!
//! Keeping them in one place lets log queries match on the same keys
//! whichever crate emitted the record.

/// Uploaded file id.
pub const FILE_ID: &str = "file_id";

/// Uploaded file name.
pub const FILE_NAME: &str = "file_name";

/// Workbook sheet name.
pub const SHEET: &str = "sheet";

/// Rows written for a sheet.
pub const ROWS: &str = "rows";

/// Instrument (`oci` / `cgs`).
pub const INSTRUMENT: &str = "instrument";

/// Narrative analysis type.
pub const ANALYSIS_TYPE: &str = "analysis_type";

/// Narrative analysis item.
pub const ANALYSIS_ITEM: &str = "analysis_item";

/// Whole ingest duration in milliseconds.
pub const INGEST_DURATION_MS: &str = "ingest_duration_ms";

/// Completion request duration in milliseconds.
pub const COMPLETION_DURATION_MS: &str = "completion_duration_ms";

/// Completion request attempt number (1-based).
pub const ATTEMPT: &str = "attempt";

/// Prompt length in characters.
pub const PROMPT_CHARS: &str = "prompt_chars";
