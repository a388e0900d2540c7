//! Narrative generation: context table + history → prompt → completion →
//! stored narrative.

use std::time::Instant;

use survey_analysis::Analyzer;
use survey_core::config::CompletionConfig;
use survey_core::errors::{CompletionError, StorageError, SurveyError};
use survey_core::events::types::NarrativeGeneratedEvent;
use survey_core::events::EventDispatcher;
use survey_core::types::{AnalysisKey, FileId, Instrument};
use survey_storage::DatabaseManager;

use crate::completion::{CompletionRequest, TextCompletion};
use crate::prompts;
use crate::store::{Narrative, NarrativeStore};

pub struct NarrativeGenerator<'a> {
    store: NarrativeStore<'a>,
    analyzer: Analyzer<'a>,
    client: &'a dyn TextCompletion,
    config: &'a CompletionConfig,
    events: &'a EventDispatcher,
}

impl<'a> NarrativeGenerator<'a> {
    pub fn new(
        db: &'a DatabaseManager,
        analyzer: Analyzer<'a>,
        client: &'a dyn TextCompletion,
        config: &'a CompletionConfig,
        events: &'a EventDispatcher,
    ) -> Self {
        Self {
            store: NarrativeStore::new(db, events),
            analyzer,
            client,
            config,
            events,
        }
    }

    /// Generate and store the narrative for one slot. Nothing is written when
    /// the completion fails.
    pub fn generate(&self, key: &AnalysisKey) -> Result<Narrative, SurveyError> {
        self.analyzer.file(key.file_id)?;
        let (kind, table) = self.analyzer.dimension_context(key)?;
        let history = self.store.history(self.config.effective_history_context())?;
        let prompt = prompts::narrative_prompt(&kind.describe(), &table.to_markdown(), &history);
        self.complete_and_store(key, prompts::NARRATIVE_SYSTEM, prompt)
    }

    /// Whole-file summary from department profiles and notable scores,
    /// stored under `overall / summary`.
    pub fn generate_overall(&self, file_id: FileId, additional: Option<&str>) -> Result<Narrative, SurveyError> {
        self.analyzer.file(file_id)?;
        let profiles = self.analyzer.department_profiles(file_id, None)?;
        let oci = self.analyzer.notable_scores(file_id, Instrument::Oci, None)?;
        let cgs = self.analyzer.notable_scores(file_id, Instrument::Cgs, None)?;
        let prompt = prompts::overall_prompt(&profiles, &oci, &cgs, additional);
        self.complete_and_store(&AnalysisKey::overall(file_id), prompts::OVERALL_SYSTEM, prompt)
    }

    fn complete_and_store(&self, key: &AnalysisKey, system: &str, prompt: String) -> Result<Narrative, SurveyError> {
        let request = CompletionRequest::from_config(self.config, system, prompt);
        let start = Instant::now();

        let text = match self.client.complete(&request) {
            Ok(text) if text.trim().is_empty() => return Err(CompletionError::EmptyCompletion.into()),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(key = %key, client = self.client.name(), error = %e, "narrative generation failed");
                return Err(e.into());
            }
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        self.store.save_generated(key, &text, &request.model)?;
        tracing::info!(
            key = %key,
            model = %request.model,
            chars = text.chars().count(),
            duration_ms,
            "narrative generated"
        );
        self.events.emit_narrative_generated(&NarrativeGeneratedEvent {
            key: key.clone(),
            model: request.model.clone(),
            chars: text.chars().count(),
            duration_ms,
        });

        let stored = self.store.load(key)?.ok_or_else(|| StorageError::NotFound {
            entity: "narrative",
            key: key.to_string(),
        })?;
        Ok(stored)
    }
}
