//! `Analyzer`: the read-side entry point over a `DatabaseManager`.

use survey_core::config::AnalysisConfig;
use survey_core::errors::AnalysisError;
use survey_core::types::{AnalysisKey, Dimension, FileId, Instrument};
use survey_storage::queries::files::{self as file_queries, FileRow};
use survey_storage::queries::narratives;
use survey_storage::queries::util::days_to_secs;
use survey_storage::retention::{self, RetentionPolicy, RetentionReport};
use survey_storage::{now_secs, DatabaseManager};

use crate::queries::context::{dimension_context, ContextKind};
use crate::queries::demographics::{self, AgeGenderRow, DistributionRow, MajorEducationRow};
use crate::queries::department::{
    self, DepartmentMatrix, DepartmentProfile, DepartmentScore, MatrixCell, NotableScore,
};
use crate::queries::files::{self, FileDetails};
use crate::queries::instrument::{self as instrument_queries, ResponseDistributionRow};
use crate::queries::report;
use crate::render::builders;
use crate::render::{Panel, Table};

/// Runs aggregation queries on the read pool and builds panels.
pub struct Analyzer<'a> {
    db: &'a DatabaseManager,
    config: &'a AnalysisConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(db: &'a DatabaseManager, config: &'a AnalysisConfig) -> Self {
        Self { db, config }
    }

    fn education_order(&self) -> Vec<String> {
        self.config.effective_education_order()
    }

    /// The upload record, or `UnknownFile`.
    pub fn file(&self, file_id: FileId) -> Result<FileRow, AnalysisError> {
        self.db
            .with_reader(|conn| file_queries::get_file(conn, file_id))?
            .ok_or(AnalysisError::UnknownFile { file_id })
    }

    fn require_category(&self, instrument: Instrument, category: &str) -> Result<(), AnalysisError> {
        if self.instrument_categories(instrument)?.iter().any(|c| c == category) {
            Ok(())
        } else {
            Err(AnalysisError::UnknownCategory {
                instrument: instrument.as_str(),
                category: category.to_string(),
            })
        }
    }

    // ---- Queries ----

    pub fn dimension_distribution(
        &self,
        file_id: FileId,
        dimension: Dimension,
    ) -> Result<Vec<DistributionRow>, AnalysisError> {
        let order = self.education_order();
        Ok(self
            .db
            .with_reader(|conn| demographics::dimension_distribution(conn, file_id, dimension, &order))?)
    }

    pub fn age_gender_crosstab(&self, file_id: FileId) -> Result<Vec<AgeGenderRow>, AnalysisError> {
        Ok(self
            .db
            .with_reader(|conn| demographics::age_gender_crosstab(conn, file_id))?)
    }

    pub fn major_education_breakdown(&self, file_id: FileId) -> Result<Vec<MajorEducationRow>, AnalysisError> {
        Ok(self
            .db
            .with_reader(|conn| demographics::major_education_breakdown(conn, file_id))?)
    }

    pub fn instrument_categories(&self, instrument: Instrument) -> Result<Vec<String>, AnalysisError> {
        Ok(self
            .db
            .with_reader(|conn| instrument_queries::instrument_categories(conn, instrument))?)
    }

    pub fn response_distribution(
        &self,
        file_id: FileId,
        instrument: Instrument,
        category: Option<&str>,
    ) -> Result<Vec<ResponseDistributionRow>, AnalysisError> {
        Ok(self.db.with_reader(|conn| {
            instrument_queries::response_distribution(conn, file_id, instrument, category)
        })?)
    }

    /// Fails with `UnknownCategory` when the catalog has no such category.
    pub fn category_department_scores(
        &self,
        file_id: FileId,
        instrument: Instrument,
        category: &str,
    ) -> Result<Vec<DepartmentScore>, AnalysisError> {
        self.require_category(instrument, category)?;
        Ok(self.db.with_reader(|conn| {
            department::category_department_scores(conn, file_id, instrument, category)
        })?)
    }

    pub fn department_category_matrix(
        &self,
        file_id: FileId,
        instrument: Instrument,
    ) -> Result<Vec<MatrixCell>, AnalysisError> {
        Ok(self
            .db
            .with_reader(|conn| department::department_category_matrix(conn, file_id, instrument))?)
    }

    pub fn department_matrix(&self, file_id: FileId, instrument: Instrument) -> Result<DepartmentMatrix, AnalysisError> {
        let cells = self.department_category_matrix(file_id, instrument)?;
        Ok(department::pivot_matrix(&cells, instrument))
    }

    /// Profiles of the largest departments; `limit` defaults to the
    /// configured profile limit.
    pub fn department_profiles(
        &self,
        file_id: FileId,
        limit: Option<usize>,
    ) -> Result<Vec<DepartmentProfile>, AnalysisError> {
        let limit = limit.unwrap_or_else(|| self.config.effective_profile_limit());
        Ok(self
            .db
            .with_reader(|conn| department::department_profiles(conn, file_id, limit))?)
    }

    pub fn notable_scores(
        &self,
        file_id: FileId,
        instrument: Instrument,
        limit: Option<usize>,
    ) -> Result<Vec<NotableScore>, AnalysisError> {
        let limit = limit.unwrap_or_else(|| self.config.effective_notable_limit());
        Ok(self
            .db
            .with_reader(|conn| department::notable_scores(conn, file_id, instrument, limit))?)
    }

    /// The context table for a narrative slot, with the resolved view.
    pub fn dimension_context(&self, key: &AnalysisKey) -> Result<(ContextKind, Table), AnalysisError> {
        let kind = ContextKind::for_key(key).ok_or_else(|| AnalysisError::UnknownCategory {
            instrument: key.analysis_type.as_str(),
            category: key.item.clone(),
        })?;
        if let ContextKind::CategoryScores { instrument, category } = &kind {
            self.require_category(*instrument, category)?;
        }
        let order = self.education_order();
        let limit = self.config.effective_profile_limit();
        let table = self
            .db
            .with_reader(|conn| dimension_context(conn, key.file_id, &kind, &order, limit))?;
        Ok((kind, table))
    }

    pub fn comprehensive_report(&self, file_id: FileId, requirements: Option<&str>) -> Result<String, AnalysisError> {
        self.file(file_id)?;
        Ok(self
            .db
            .with_reader(|conn| report::comprehensive_report(conn, file_id, requirements))?)
    }

    // ---- Files and maintenance ----

    pub fn list_files(&self, limit: usize) -> Result<Vec<FileRow>, AnalysisError> {
        Ok(self.db.with_reader(|conn| file_queries::list_files(conn, limit))?)
    }

    /// Files uploaded within the last `days` days, newest first.
    pub fn recent_files(&self, days: u32, limit: usize) -> Result<Vec<FileRow>, AnalysisError> {
        let since = now_secs() - days_to_secs(days);
        Ok(self
            .db
            .with_reader(|conn| file_queries::recent_files(conn, since, limit))?)
    }

    pub fn file_details(&self, file_id: FileId, max_rows: usize) -> Result<FileDetails, AnalysisError> {
        self.db
            .with_reader(|conn| files::file_details(conn, file_id, max_rows))?
            .ok_or(AnalysisError::UnknownFile { file_id })
    }

    /// Delete a file and everything loaded from it.
    pub fn delete_file(&self, file_id: FileId) -> Result<(), AnalysisError> {
        let deleted = self
            .db
            .with_writer(|conn| file_queries::delete_file(conn, file_id))?;
        if !deleted {
            return Err(AnalysisError::UnknownFile { file_id });
        }
        tracing::info!(file_id, "file deleted");
        Ok(())
    }

    /// Purge expired uploads and narratives, then checkpoint the WAL when
    /// anything was removed.
    pub fn apply_retention(&self, policy: &RetentionPolicy, now: i64) -> Result<RetentionReport, AnalysisError> {
        let report = self
            .db
            .with_writer(|conn| retention::apply_retention(conn, policy, now))?;
        if report.total_deleted > 0 {
            self.db.checkpoint()?;
        }
        Ok(report)
    }

    // ---- Panels ----

    fn attach_narrative(&self, panel: Panel) -> Result<Panel, AnalysisError> {
        let Some(key) = panel.narrative_key.clone() else {
            return Ok(panel);
        };
        let stored = self.db.with_reader(|conn| {
            narratives::get_narrative(conn, key.file_id, key.analysis_type.as_str(), &key.item)
        })?;
        Ok(match stored {
            Some(row) => panel.with_narrative(row.analysis_text),
            None => panel,
        })
    }

    pub fn distribution_panel(&self, file_id: FileId, dimension: Dimension) -> Result<Panel, AnalysisError> {
        let rows = self.dimension_distribution(file_id, dimension)?;
        self.attach_narrative(builders::distribution_panel(file_id, dimension, &rows))
    }

    pub fn age_gender_panel(&self, file_id: FileId) -> Result<Panel, AnalysisError> {
        let rows = self.age_gender_crosstab(file_id)?;
        self.attach_narrative(builders::age_gender_panel(file_id, &rows))
    }

    pub fn major_education_panel(&self, file_id: FileId) -> Result<Panel, AnalysisError> {
        let rows = self.major_education_breakdown(file_id)?;
        let order = self.education_order();
        self.attach_narrative(builders::major_education_panel(file_id, &rows, &order))
    }

    pub fn response_distribution_panel(
        &self,
        file_id: FileId,
        instrument: Instrument,
        category: &str,
    ) -> Result<Panel, AnalysisError> {
        self.require_category(instrument, category)?;
        let rows = self.response_distribution(file_id, instrument, Some(category))?;
        self.attach_narrative(builders::response_distribution_panel(file_id, instrument, category, &rows))
    }

    pub fn department_scores_panel(
        &self,
        file_id: FileId,
        instrument: Instrument,
        category: &str,
    ) -> Result<Panel, AnalysisError> {
        let scores = self.category_department_scores(file_id, instrument, category)?;
        self.attach_narrative(builders::department_scores_panel(file_id, instrument, category, &scores))
    }

    pub fn department_matrix_panel(&self, file_id: FileId, instrument: Instrument) -> Result<Panel, AnalysisError> {
        let matrix = self.department_matrix(file_id, instrument)?;
        self.attach_narrative(builders::department_matrix_panel(file_id, instrument, &matrix))
    }
}
