//! Retention against the real migrated schema.

use survey_core::config::RetentionConfig;
use survey_core::types::Instrument;
use survey_storage::queries::questions::{self, QuestionRow};
use survey_storage::queries::respondents::{self, RespondentRow};
use survey_storage::queries::responses::{self, ResponseRow};
use survey_storage::queries::{files, narratives};
use survey_storage::retention::{apply_retention, RetentionPolicy};
use survey_storage::DatabaseManager;

const DAY: i64 = 86_400;
const NOW: i64 = 1_750_000_000;

fn seed_file(db: &DatabaseManager, name: &str, uploaded_at: i64) -> i64 {
    db.with_writer(|conn| {
        let f = files::insert_file(conn, name, uploaded_at)?;
        questions::upsert_question(
            conn,
            Instrument::Oci,
            &QuestionRow {
                survey_id: "Q1".into(),
                question_category: Some("Power".into()),
                question_text: None,
            },
            uploaded_at,
        )?;
        respondents::insert_respondent(
            conn,
            f,
            &RespondentRow {
                respondent_id: "R1".into(),
                ..Default::default()
            },
            uploaded_at,
        )?;
        responses::insert_response(
            conn,
            Instrument::Oci,
            f,
            &ResponseRow {
                respondent_id: "R1".into(),
                survey_id: "Q1".into(),
                response: 3,
                response_meaning: None,
            },
            uploaded_at,
        )?;
        Ok(f)
    })
    .unwrap()
}

#[test]
fn default_policy_matches_config_defaults() {
    let policy = RetentionPolicy::default();
    assert_eq!(policy.file_days, 30);
    assert_eq!(policy.narrative_days, 30);

    let config = RetentionConfig {
        file_days: Some(7),
        ..Default::default()
    };
    assert_eq!(RetentionPolicy::from(&config).file_days, 7);
}

#[test]
fn old_files_are_removed_with_their_rows() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let old = seed_file(&db, "old.xlsx", NOW - 40 * DAY);
    let fresh = seed_file(&db, "fresh.xlsx", NOW - 2 * DAY);

    let report = db
        .with_writer(|conn| apply_retention(conn, &RetentionPolicy::default(), NOW))
        .unwrap();

    assert_eq!(report.total_deleted, 3);
    let tables: Vec<_> = report.per_table.iter().map(|t| t.table.as_str()).collect();
    assert!(tables.contains(&"uploaded_files"));
    assert!(tables.contains(&"respondents (cascade)"));
    assert!(tables.contains(&"oci_responses (cascade)"));

    db.with_reader(|conn| {
        assert!(files::get_file(conn, old)?.is_none());
        assert!(files::get_file(conn, fresh)?.is_some());
        assert_eq!(files::file_counts(conn, fresh)?.oci_responses, 1);
        Ok(())
    })
    .unwrap();
}

#[test]
fn stale_narratives_removed_from_kept_files() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let f = seed_file(&db, "kept.xlsx", NOW - DAY);
    db.with_writer(|conn| {
        narratives::upsert_narrative(conn, f, "oci", "Power", "stale", NOW - 45 * DAY)?;
        narratives::upsert_narrative(conn, f, "cgs", "Board", "fresh", NOW - DAY)
    })
    .unwrap();

    let policy = RetentionPolicy {
        file_days: 365,
        narrative_days: 30,
    };
    let report = db
        .with_writer(|conn| apply_retention(conn, &policy, NOW))
        .unwrap();
    assert_eq!(report.total_deleted, 1);

    let remaining = db
        .with_reader(|conn| narratives::list_for_file(conn, f))
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].analysis_item, "Board");
}

#[test]
fn nothing_to_delete_gives_empty_report() {
    let db = DatabaseManager::open_in_memory().unwrap();
    seed_file(&db, "a.xlsx", NOW);
    let report = db
        .with_writer(|conn| apply_retention(conn, &RetentionPolicy::default(), NOW))
        .unwrap();
    assert_eq!(report.total_deleted, 0);
    assert!(report.per_table.is_empty());
}
