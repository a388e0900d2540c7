//! `Analyzer` over a `DatabaseManager`: validation, context tables, file
//! management, and panels.

mod common;

use common::*;
use survey_analysis::{Analyzer, Cell, ContextKind};
use survey_core::config::AnalysisConfig;
use survey_core::errors::{AnalysisError, SurveyErrorCode};
use survey_core::types::{AnalysisKey, AnalysisType, Dimension, Instrument};
use survey_storage::queries::narratives;
use survey_storage::retention::RetentionPolicy;
use survey_storage::{now_secs, with_immediate_transaction};

#[test]
fn unknown_category_is_rejected() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let err = analyzer
        .category_department_scores(file, Instrument::Oci, "Nope")
        .unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownCategory { .. }));
    assert!(analyzer
        .response_distribution_panel(file, Instrument::Cgs, "Power")
        .is_err());
}

#[test]
fn unknown_file_is_reported() {
    let (db, _) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let err = analyzer.file_details(999, 5).unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownFile { file_id: 999 }));
    assert_eq!(err.error_code(), "NOT_FOUND");
    assert!(analyzer.comprehensive_report(999, None).is_err());
    assert!(analyzer.delete_file(999).is_err());
}

#[test]
fn context_kind_resolves_every_slot() {
    let key = |t, item: &str| AnalysisKey::new(1, t, item);
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Respondent, "department")),
        Some(ContextKind::Distribution(Dimension::Department))
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Respondent, "age")),
        Some(ContextKind::AgeGender)
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Respondent, "certification")),
        Some(ContextKind::Distribution(Dimension::Certification))
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Education, "level")),
        Some(ContextKind::Distribution(Dimension::EducationLevel))
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Education, "major")),
        Some(ContextKind::MajorEducation)
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Cgs, "Board")),
        Some(ContextKind::CategoryScores {
            instrument: Instrument::Cgs,
            category: "Board".into()
        })
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Oci, "departments")),
        Some(ContextKind::DepartmentMatrix(Instrument::Oci))
    );
    assert_eq!(
        ContextKind::for_key(&key(AnalysisType::Overall, "summary")),
        Some(ContextKind::Profiles)
    );
    assert_eq!(ContextKind::for_key(&key(AnalysisType::Respondent, "shoe size")), None);
}

#[test]
fn dimension_context_builds_tables() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let (kind, table) = analyzer
        .dimension_context(&AnalysisKey::new(file, AnalysisType::Oci, "Power"))
        .unwrap();
    assert!(matches!(kind, ContextKind::CategoryScores { .. }));
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], Cell::text("IT"));

    let (_, table) = analyzer
        .dimension_context(&AnalysisKey::new(file, AnalysisType::Education, "level"))
        .unwrap();
    assert_eq!(table.rows[0][0], Cell::text("고졸"));

    let err = analyzer
        .dimension_context(&AnalysisKey::new(file, AnalysisType::Respondent, "shoe size"))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownCategory { .. }));
}

#[test]
fn configured_education_order_is_used() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig {
        education_order: vec!["박사".into(), "석사".into()],
        ..Default::default()
    };
    let analyzer = Analyzer::new(&db, &config);
    let rows = analyzer
        .dimension_distribution(file, Dimension::EducationLevel)
        .unwrap();
    assert_eq!(rows[0].label, "박사");
    assert_eq!(rows[1].label, "석사");
    // Unlisted levels keep count order: 대졸 (2) before 고졸 (1).
    assert_eq!(rows[2].label, "대졸");
}

#[test]
fn profiles_and_notables_default_to_config_limits() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig {
        profile_limit: Some(1),
        notable_limit: Some(3),
        ..Default::default()
    };
    let analyzer = Analyzer::new(&db, &config);
    assert_eq!(analyzer.department_profiles(file, None).unwrap().len(), 1);
    assert_eq!(analyzer.department_profiles(file, Some(5)).unwrap().len(), 2);
    assert_eq!(analyzer.notable_scores(file, Instrument::Oci, None).unwrap().len(), 3);
}

#[test]
fn file_details_preview_rows() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let details = analyzer.file_details(file, 2).unwrap();
    assert_eq!(details.file.file_name, "survey.xlsx");
    assert_eq!(details.counts.respondents, 5);
    assert_eq!(details.counts.oci_responses, 15);
    assert_eq!(details.counts.cgs_responses, 8);
    assert_eq!(details.respondents.len(), 2);
    assert_eq!(details.oci_responses.len(), 2);
    assert_eq!(details.cgs_responses.len(), 2);
}

#[test]
fn listing_and_deleting_files() {
    let db = setup_db();
    let first = load(&db, "first.xlsx", survey_workbook());
    let second = load(&db, "second.xlsx", survey_workbook());
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let files = analyzer.list_files(10).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(analyzer.recent_files(1, 10).unwrap().len(), 2);
    assert_eq!(analyzer.list_files(1).unwrap().len(), 1);

    analyzer.delete_file(first).unwrap();
    let files = analyzer.list_files(10).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_id, second);
    assert!(analyzer
        .dimension_distribution(first, Dimension::Department)
        .unwrap()
        .is_empty());
}

#[test]
fn retention_purges_old_files() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let far_future = now_secs() + 365 * 86_400;
    let report = analyzer
        .apply_retention(&RetentionPolicy::default(), far_future)
        .unwrap();
    assert!(report.total_deleted >= 1);
    assert!(matches!(
        analyzer.file_details(file, 1),
        Err(AnalysisError::UnknownFile { .. })
    ));
}

#[test]
fn retention_on_a_file_database_truncates_the_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.db");
    let db = survey_storage::DatabaseManager::open(&path).unwrap();
    let file = load(&db, "survey.xlsx", survey_workbook());
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let report = analyzer
        .apply_retention(&RetentionPolicy::default(), now_secs() + 365 * 86_400)
        .unwrap();
    assert!(report.total_deleted >= 1);
    assert!(analyzer.list_files(10).unwrap().iter().all(|f| f.file_id != file));

    let wal = dir.path().join("survey.db-wal");
    if wal.exists() {
        assert_eq!(std::fs::metadata(&wal).unwrap().len(), 0);
    }
}

#[test]
fn panels_carry_stored_narrative() {
    let (db, file) = loaded_db();
    db.with_writer(|conn| {
        with_immediate_transaction(conn, |tx| {
            narratives::upsert_narrative(tx, file, "respondent", "gender", "Mostly women.", now_secs())
        })
    })
    .unwrap();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let panel = analyzer.distribution_panel(file, Dimension::Gender).unwrap();
    assert_eq!(panel.narrative.as_deref(), Some("Mostly women."));
    assert_eq!(panel.metrics[1].value, Cell::text("F"));

    let panel = analyzer.distribution_panel(file, Dimension::Department).unwrap();
    assert!(panel.narrative.is_none());
}

#[test]
fn instrument_panels_build_for_loaded_file() {
    let (db, file) = loaded_db();
    let config = AnalysisConfig::default();
    let analyzer = Analyzer::new(&db, &config);

    let panel = analyzer
        .response_distribution_panel(file, Instrument::Oci, "Power")
        .unwrap();
    assert_eq!(panel.metrics[0].value, Cell::Score(3.3));

    let panel = analyzer
        .department_scores_panel(file, Instrument::Oci, "Power")
        .unwrap();
    assert_eq!(panel.charts.len(), 2);
    assert_eq!(panel.charts[1].series.len(), 2);

    let panel = analyzer.department_matrix_panel(file, Instrument::Cgs).unwrap();
    assert_eq!(panel.tables[0].headers, vec!["Department", "Board", "Disclosure"]);

    let panel = analyzer.age_gender_panel(file).unwrap();
    assert!(panel.charts[0].has_overlay());
    let panel = analyzer.major_education_panel(file).unwrap();
    assert_eq!(panel.metrics[1].value, Cell::text("Business"));
}
