//! SurveyEventHandler trait, every method a no-op by default.

use super::types::*;

/// Observer for ingest and narrative lifecycle events.
///
/// Implementors override only what they need. `Send + Sync` so a dispatcher
/// can be shared behind an `Arc`.
pub trait SurveyEventHandler: Send + Sync {
    // ---- Upload lifecycle ----
    fn on_upload_started(&self, _event: &UploadStartedEvent) {}
    fn on_sheet_loaded(&self, _event: &SheetLoadedEvent) {}
    fn on_upload_complete(&self, _event: &UploadCompleteEvent) {}
    fn on_upload_failed(&self, _event: &UploadFailedEvent) {}

    // ---- Narratives ----
    fn on_narrative_saved(&self, _event: &NarrativeSavedEvent) {}
    fn on_narrative_generated(&self, _event: &NarrativeGeneratedEvent) {}
}
