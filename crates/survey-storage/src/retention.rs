//! Time-based retention for the survey database.
//!
//! Two rules:
//! - uploaded files older than `file_days` are deleted, cascading to their
//!   respondents, responses, narratives and history,
//! - narratives created more than `narrative_days` ago are deleted even when
//!   their file is kept.

use rusqlite::{params, Connection};
use serde::Serialize;
use survey_core::config::RetentionConfig;
use survey_core::errors::StorageError;

use crate::connection::writer::with_immediate_transaction;
use crate::queries::util::{days_to_secs, sqlite_error};

/// Retention periods in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub file_days: u32,
    pub narrative_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from(&RetentionConfig::default())
    }
}

impl From<&RetentionConfig> for RetentionPolicy {
    fn from(config: &RetentionConfig) -> Self {
        Self {
            file_days: config.effective_file_days(),
            narrative_days: config.effective_narrative_days(),
        }
    }
}

/// What a retention pass removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetentionReport {
    pub total_deleted: u64,
    pub per_table: Vec<TableCleanup>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCleanup {
    pub table: String,
    pub deleted: u64,
}

/// Tables whose rows disappear with their file through `ON DELETE CASCADE`.
const FILE_CHILD_TABLES: [&str; 5] = [
    "respondents",
    "oci_responses",
    "cgs_responses",
    "narratives",
    "narrative_history",
];

/// Apply `policy` relative to `now` (unix seconds) in one transaction,
/// then release freed pages with an incremental vacuum.
pub fn apply_retention(
    conn: &Connection,
    policy: &RetentionPolicy,
    now: i64,
) -> Result<RetentionReport, StorageError> {
    let start = std::time::Instant::now();
    let mut report = RetentionReport::default();

    with_immediate_transaction(conn, |tx| {
        let file_cutoff = now - days_to_secs(policy.file_days);
        let narrative_cutoff = now - days_to_secs(policy.narrative_days);

        // Cascaded deletes do not show up in `changes()`, so count first.
        for table in FILE_CHILD_TABLES {
            let sql = format!(
                "SELECT COUNT(*) FROM {table} WHERE file_id IN
                    (SELECT file_id FROM uploaded_files WHERE uploaded_at < ?1)"
            );
            let n: i64 = tx
                .query_row(&sql, params![file_cutoff], |row| row.get(0))
                .map_err(sqlite_error)?;
            record(&mut report, &format!("{table} (cascade)"), n as u64);
        }

        let files = tx
            .execute(
                "DELETE FROM uploaded_files WHERE uploaded_at < ?1",
                params![file_cutoff],
            )
            .map_err(sqlite_error)?;
        record(&mut report, "uploaded_files", files as u64);

        let narratives = tx
            .execute(
                "DELETE FROM narratives WHERE created_at < ?1",
                params![narrative_cutoff],
            )
            .map_err(sqlite_error)?;
        record(&mut report, "narratives", narratives as u64);

        Ok(())
    })?;

    conn.execute_batch("PRAGMA incremental_vacuum;")
        .map_err(sqlite_error)?;

    report.duration_ms = start.elapsed().as_millis() as u64;
    report.total_deleted = report.per_table.iter().map(|t| t.deleted).sum();
    tracing::info!(
        total_deleted = report.total_deleted,
        duration_ms = report.duration_ms,
        "retention applied"
    );
    Ok(report)
}

fn record(report: &mut RetentionReport, table: &str, deleted: u64) {
    if deleted > 0 {
        report.per_table.push(TableCleanup {
            table: table.to_string(),
            deleted,
        });
    }
}
