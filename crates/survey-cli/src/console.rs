//! Progress lines on stderr for long-running commands.

use survey_core::events::types::{
    NarrativeGeneratedEvent, SheetLoadedEvent, UploadCompleteEvent, UploadFailedEvent,
    UploadStartedEvent,
};
use survey_core::events::SurveyEventHandler;

pub struct ConsoleHandler;

impl SurveyEventHandler for ConsoleHandler {
    fn on_upload_started(&self, event: &UploadStartedEvent) {
        eprintln!("uploading {}", event.file_name);
    }

    fn on_sheet_loaded(&self, event: &SheetLoadedEvent) {
        eprintln!("  {:<12} {:>6} rows", event.sheet, event.rows);
    }

    fn on_upload_complete(&self, event: &UploadCompleteEvent) {
        eprintln!(
            "done: file {} ({} respondents, {} OCI / {} CGS responses) in {} ms",
            event.file_id,
            event.respondents,
            event.oci_responses,
            event.cgs_responses,
            event.duration_ms
        );
    }

    fn on_upload_failed(&self, event: &UploadFailedEvent) {
        eprintln!("upload of {} failed [{}]: {}", event.file_name, event.error_code, event.message);
    }

    fn on_narrative_generated(&self, event: &NarrativeGeneratedEvent) {
        eprintln!(
            "generated {} ({} chars, {}, {} ms)",
            event.key, event.chars, event.model, event.duration_ms
        );
    }
}
