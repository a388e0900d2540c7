//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::SurveyEventHandler;
use super::types::*;

/// Holds the registered handlers. With none registered every `emit_*` is a
/// loop over an empty `Vec`.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn SurveyEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn SurveyEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler is logged and skipped; later handlers still run.
    fn emit<F: Fn(&dyn SurveyEventHandler)>(&self, event_name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!(event = event_name, "event handler panicked");
            }
        }
    }

    // ---- Upload lifecycle ----
    pub fn emit_upload_started(&self, event: &UploadStartedEvent) {
        self.emit("upload_started", |h| h.on_upload_started(event));
    }

    pub fn emit_sheet_loaded(&self, event: &SheetLoadedEvent) {
        self.emit("sheet_loaded", |h| h.on_sheet_loaded(event));
    }

    pub fn emit_upload_complete(&self, event: &UploadCompleteEvent) {
        self.emit("upload_complete", |h| h.on_upload_complete(event));
    }

    pub fn emit_upload_failed(&self, event: &UploadFailedEvent) {
        self.emit("upload_failed", |h| h.on_upload_failed(event));
    }

    // ---- Narratives ----
    pub fn emit_narrative_saved(&self, event: &NarrativeSavedEvent) {
        self.emit("narrative_saved", |h| h.on_narrative_saved(event));
    }

    pub fn emit_narrative_generated(&self, event: &NarrativeGeneratedEvent) {
        self.emit("narrative_generated", |h| h.on_narrative_generated(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
