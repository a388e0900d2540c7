//! Event payloads.

use crate::types::{AnalysisKey, FileId};

/// Payload for `on_upload_started`.
#[derive(Debug, Clone)]
pub struct UploadStartedEvent {
    pub file_name: String,
}

/// Payload for `on_sheet_loaded`.
#[derive(Debug, Clone)]
pub struct SheetLoadedEvent {
    pub file_id: FileId,
    pub sheet: String,
    pub rows: usize,
}

/// Payload for `on_upload_complete`.
#[derive(Debug, Clone)]
pub struct UploadCompleteEvent {
    pub file_id: FileId,
    pub file_name: String,
    pub respondents: usize,
    pub oci_responses: usize,
    pub cgs_responses: usize,
    pub duration_ms: u64,
}

/// Payload for `on_upload_failed`.
#[derive(Debug, Clone)]
pub struct UploadFailedEvent {
    pub file_name: String,
    pub error_code: String,
    pub message: String,
}

/// Payload for `on_narrative_saved`.
#[derive(Debug, Clone)]
pub struct NarrativeSavedEvent {
    pub key: AnalysisKey,
    pub chars: usize,
}

/// Payload for `on_narrative_generated`.
#[derive(Debug, Clone)]
pub struct NarrativeGeneratedEvent {
    pub key: AnalysisKey,
    pub model: String,
    pub chars: usize,
    pub duration_ms: u64,
}
