//! Narrative slots: load, save, list, delete, and the generation history.

use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::events::types::NarrativeSavedEvent;
use survey_core::events::EventDispatcher;
use survey_core::types::{AnalysisKey, AnalysisType, FileId};
use survey_storage::queries::history::{self, HistoryRow};
use survey_storage::queries::narratives::{self, NarrativeRow};
use survey_storage::{now_secs, with_immediate_transaction, DatabaseManager};

/// Current text of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub key: AnalysisKey,
    pub text: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Narrative {
    fn from_row(row: NarrativeRow) -> Option<Self> {
        let analysis_type = match row.analysis_type.parse::<AnalysisType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file_id = row.file_id, error = %e, "skipping narrative with unknown type");
                return None;
            }
        };
        Some(Self {
            key: AnalysisKey::new(row.file_id, analysis_type, row.analysis_item),
            text: row.analysis_text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Last write time.
    pub fn touched_at(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }
}

pub struct NarrativeStore<'a> {
    db: &'a DatabaseManager,
    events: &'a EventDispatcher,
}

impl<'a> NarrativeStore<'a> {
    pub fn new(db: &'a DatabaseManager, events: &'a EventDispatcher) -> Self {
        Self { db, events }
    }

    pub fn load(&self, key: &AnalysisKey) -> Result<Option<Narrative>, StorageError> {
        let row = self.db.with_reader(|conn| {
            narratives::get_narrative(conn, key.file_id, key.analysis_type.as_str(), &key.item)
        })?;
        Ok(row.and_then(Narrative::from_row))
    }

    /// The slot's text, or an empty string when nothing is stored.
    pub fn load_text(&self, key: &AnalysisKey) -> Result<String, StorageError> {
        Ok(self.load(key)?.map(|n| n.text).unwrap_or_default())
    }

    /// Insert or overwrite the slot's text.
    pub fn save(&self, key: &AnalysisKey, text: &str) -> Result<(), StorageError> {
        let now = now_secs();
        self.db.with_writer(|conn| {
            narratives::upsert_narrative(conn, key.file_id, key.analysis_type.as_str(), &key.item, text, now)
        })?;
        tracing::debug!(key = %key, chars = text.chars().count(), "narrative saved");
        self.events.emit_narrative_saved(&NarrativeSavedEvent {
            key: key.clone(),
            chars: text.chars().count(),
        });
        Ok(())
    }

    /// Store generated text as the slot's narrative and append it to the
    /// history, atomically.
    pub(crate) fn save_generated(&self, key: &AnalysisKey, text: &str, model: &str) -> Result<(), StorageError> {
        let now = now_secs();
        let analysis_type = key.analysis_type.as_str();
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                narratives::upsert_narrative(tx, key.file_id, analysis_type, &key.item, text, now)?;
                history::append(tx, key.file_id, analysis_type, &key.item, text, Some(model), now)?;
                Ok(())
            })
        })
    }

    /// Every narrative of `file_id`, most recently written first.
    pub fn list(&self, file_id: FileId) -> Result<Vec<Narrative>, StorageError> {
        let rows = self.db.with_reader(|conn| narratives::list_for_file(conn, file_id))?;
        Ok(rows.into_iter().filter_map(Narrative::from_row).collect())
    }

    /// Returns false when the slot was empty.
    pub fn delete(&self, key: &AnalysisKey) -> Result<bool, StorageError> {
        self.db.with_writer(|conn| {
            narratives::delete_narrative(conn, key.file_id, key.analysis_type.as_str(), &key.item)
        })
    }

    /// Generated narratives across all files, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<HistoryRow>, StorageError> {
        self.db.with_reader(|conn| history::query_recent(conn, limit))
    }

    /// Generated narratives logged across every file.
    pub fn history_len(&self) -> Result<i64, StorageError> {
        self.db.with_reader(history::count)
    }
}
