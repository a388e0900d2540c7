//! Aggregation queries against a loaded survey.

mod common;

use common::*;
use proptest::prelude::*;
use survey_core::constants::DEFAULT_EDUCATION_ORDER;
use survey_core::types::{Dimension, Instrument};
use survey_ingest::MemorySource;
use survey_analysis::queries::demographics::{
    age_gender_crosstab, dimension_distribution, major_education_breakdown, major_totals,
    sort_by_rank, DistributionRow,
};
use survey_analysis::queries::department::{
    category_department_scores, department_category_matrix, department_profiles, notable_scores,
    pivot_matrix,
};
use survey_analysis::queries::instrument::{
    category_summary, instrument_categories, response_distribution, response_pivot,
};
use survey_analysis::queries::report::comprehensive_report;
use survey_analysis::queries::{percentage, round_to};

fn education_order() -> Vec<String> {
    DEFAULT_EDUCATION_ORDER.iter().map(|s| s.to_string()).collect()
}

fn labels(rows: &[DistributionRow]) -> Vec<&str> {
    rows.iter().map(|r| r.label.as_str()).collect()
}

// ---- Demographics ----

#[test]
fn department_distribution_orders_by_count() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| dimension_distribution(c, file, Dimension::Department, &[]))
        .unwrap();
    assert_eq!(labels(&rows), vec!["IT", "HR"]);
    assert_eq!(rows[0].count, 3);
    assert_eq!(rows[0].percentage, 60.0);
    assert_eq!(rows[1].percentage, 40.0);
}

#[test]
fn age_groups_order_by_label() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| dimension_distribution(c, file, Dimension::AgeGroup, &[]))
        .unwrap();
    assert_eq!(labels(&rows), vec!["20s", "30s", "40s"]);
    assert_eq!(rows[2].percentage, 20.0);
}

#[test]
fn education_levels_follow_configured_rank() {
    let (db, file) = loaded_db();
    let order = education_order();
    let rows = db
        .with_reader(|c| dimension_distribution(c, file, Dimension::EducationLevel, &order))
        .unwrap();
    assert_eq!(labels(&rows), vec!["고졸", "대졸", "석사", "박사"]);
    assert_eq!(rows[1].count, 2);
}

#[test]
fn certification_skips_respondents_without_one() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| dimension_distribution(c, file, Dimension::Certification, &[]))
        .unwrap();
    assert_eq!(labels(&rows), vec!["PMP", "CISA"]);
    assert_eq!(rows[0].percentage, 66.7);
    assert_eq!(rows[1].percentage, 33.3);
}

#[test]
fn unlisted_education_levels_sort_last_in_original_order() {
    let mut rows: Vec<DistributionRow> = ["기타", "석사", "미상", "고졸"]
        .iter()
        .map(|l| DistributionRow {
            label: l.to_string(),
            count: 1,
            percentage: 25.0,
        })
        .collect();
    sort_by_rank(&mut rows, &education_order());
    assert_eq!(labels(&rows), vec!["고졸", "석사", "기타", "미상"]);
}

#[test]
fn age_gender_shares_within_group_and_total() {
    let (db, file) = loaded_db();
    let rows = db.with_reader(|c| age_gender_crosstab(c, file)).unwrap();
    let twenties: Vec<_> = rows.iter().filter(|r| r.age_group == "20s").collect();
    assert_eq!(twenties.len(), 1);
    assert_eq!(twenties[0].gender, "F");
    assert_eq!(twenties[0].count, 2);
    assert_eq!(twenties[0].gender_percentage, 100.0);
    assert_eq!(twenties[0].total_percentage, 40.0);

    let first = &rows[0];
    assert_eq!((first.age_group.as_str(), first.gender.as_str()), ("20s", "F"));
}

#[test]
fn major_education_breakdown_and_totals() {
    let (db, file) = loaded_db();
    let rows = db.with_reader(|c| major_education_breakdown(c, file)).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.count == 1 && r.percentage == 20.0));
    assert_eq!((rows[0].major.as_str(), rows[0].education_level.as_str()), ("Business", "고졸"));
    let total: f64 = rows.iter().map(|r| r.percentage).sum();
    assert!((total - 100.0).abs() < 0.5);

    let totals = major_totals(&rows);
    assert_eq!(totals[0].label, "Business");
    assert_eq!(totals[0].count, 2);
    assert_eq!(totals[0].percentage, 40.0);
}

// ---- Instruments ----

#[test]
fn oci_categories_follow_culture_style_order() {
    let (db, _) = loaded_db();
    let oci = db.with_reader(|c| instrument_categories(c, Instrument::Oci)).unwrap();
    assert_eq!(oci, vec!["Power", "Achievement"]);
    let cgs = db.with_reader(|c| instrument_categories(c, Instrument::Cgs)).unwrap();
    assert_eq!(cgs, vec!["Board", "Disclosure"]);
}

#[test]
fn response_distribution_percentages_per_question() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| response_distribution(c, file, Instrument::Oci, Some("Power")))
        .unwrap();
    assert!(rows.iter().all(|r| r.category.as_deref() == Some("Power")));
    let q1: Vec<(i64, f64)> = rows
        .iter()
        .filter(|r| r.survey_id == "OCI_01")
        .map(|r| (r.response, r.percentage))
        .collect();
    assert_eq!(q1, vec![(1, 20.0), (2, 20.0), (4, 20.0), (5, 40.0)]);

    let all = db
        .with_reader(|c| response_distribution(c, file, Instrument::Oci, None))
        .unwrap();
    assert!(all.iter().any(|r| r.survey_id == "OCI_03"));
}

#[test]
fn pivot_fills_missing_values_with_zero() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| response_distribution(c, file, Instrument::Oci, Some("Power")))
        .unwrap();
    let pivot = response_pivot(&rows, Instrument::Oci);
    assert_eq!(pivot.survey_ids, vec!["OCI_01", "OCI_02"]);
    assert_eq!(pivot.responses, vec![1, 2, 3, 4, 5]);
    assert_eq!(pivot.columns[0], "1 - Strongly disagree");
    assert_eq!(pivot.values[0], vec![20.0, 20.0, 0.0, 20.0, 40.0]);
    assert_eq!(pivot.values[1], vec![20.0, 20.0, 0.0, 40.0, 20.0]);
}

#[test]
fn category_summary_averages_question_means() {
    let (db, file) = loaded_db();
    let rows = db
        .with_reader(|c| response_distribution(c, file, Instrument::Oci, Some("Power")))
        .unwrap();
    let summary = category_summary(&rows, Instrument::Oci).unwrap();
    assert_eq!(summary.mean, 3.3);
    assert_eq!(summary.min, 3.2);
    assert_eq!(summary.max, 3.4);
    assert_eq!(summary.positive_ratio, 60.0);
    assert_eq!(summary.questions, 2);
    assert_eq!(summary.responses, 10);

    assert!(category_summary(&[], Instrument::Oci).is_none());
}

// ---- Departments ----

#[test]
fn department_scores_use_per_respondent_averages() {
    let (db, file) = loaded_db();
    let scores = db
        .with_reader(|c| category_department_scores(c, file, Instrument::Oci, "Power"))
        .unwrap();
    assert_eq!(scores.len(), 2);

    let it = &scores[0];
    assert_eq!(it.department, "IT");
    assert_eq!(it.respondents, 3);
    assert_eq!(it.avg_score, 4.5);
    assert_eq!(it.min_score, 4.0);
    assert_eq!(it.max_score, 5.0);
    assert_eq!(it.std_score, Some(0.5));

    let hr = &scores[1];
    assert_eq!(hr.avg_score, 1.5);
    assert_eq!(hr.std_score, Some(0.0));
}

#[test]
fn single_respondent_has_no_std_dev() {
    let (db, file) = loaded_db();
    let scores = db
        .with_reader(|c| category_department_scores(c, file, Instrument::Cgs, "Disclosure"))
        .unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].respondents, 1);
    assert_eq!(scores[0].std_score, None);
}

#[test]
fn matrix_pivots_departments_by_category() {
    let (db, file) = loaded_db();
    let cells = db
        .with_reader(|c| department_category_matrix(c, file, Instrument::Oci))
        .unwrap();
    let it_power = cells
        .iter()
        .find(|c| c.department == "IT" && c.category == "Power")
        .unwrap();
    assert_eq!(it_power.avg_score, 4.5);
    assert_eq!(it_power.respondent_count, 3);

    let matrix = pivot_matrix(&cells, Instrument::Oci);
    assert_eq!(matrix.departments, vec!["HR", "IT"]);
    assert_eq!(matrix.categories, vec!["Power", "Achievement"]);
    assert_eq!(matrix.values[0], vec![Some(1.5), Some(4.5)]);
    assert_eq!(matrix.values[1], vec![Some(4.5), Some(2.0)]);
}

#[test]
fn profiles_join_distinct_values() {
    let (db, file) = loaded_db();
    let profiles = db.with_reader(|c| department_profiles(c, file, 8)).unwrap();
    assert_eq!(profiles.len(), 2);
    let it = &profiles[0];
    assert_eq!(it.department, "IT");
    assert_eq!(it.count, 3);
    assert_eq!(it.genders, "F, M");
    assert_eq!(it.majors, "CS, EE");
    assert_eq!(it.experience_ranges, "0-5, 5-10");

    let limited = db.with_reader(|c| department_profiles(c, file, 1)).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn notable_scores_keep_only_extremes() {
    let (db, file) = loaded_db();
    let oci = db
        .with_reader(|c| notable_scores(c, file, Instrument::Oci, 20))
        .unwrap();
    assert_eq!(oci.len(), 6);
    assert_eq!((oci[0].department.as_str(), oci[0].survey_id.as_str()), ("HR", "OCI_03"));
    assert_eq!(oci[0].avg_score, 4.5);
    let it_q1 = oci.iter().find(|n| n.department == "IT" && n.survey_id == "OCI_01").unwrap();
    assert_eq!(it_q1.avg_score, 4.67);
    assert_eq!(it_q1.question_avg, 3.4);
    assert_eq!(it_q1.question_text.as_deref(), Some("Managers decide alone"));

    let limited = db
        .with_reader(|c| notable_scores(c, file, Instrument::Oci, 2))
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn notable_cgs_requires_three_responses() {
    let (db, file) = loaded_db();
    let cgs = db
        .with_reader(|c| notable_scores(c, file, Instrument::Cgs, 20))
        .unwrap();
    assert_eq!(cgs.len(), 1);
    assert_eq!(cgs[0].department, "IT");
    assert_eq!(cgs[0].survey_id, "CGS_01");
    assert_eq!(cgs[0].responses, 3);
    assert_eq!(cgs[0].avg_score, 6.67);
}

#[test]
fn joins_stay_within_one_file() {
    let db = setup_db();
    let first = load(&db, "first.xlsx", survey_workbook());
    let _second = load(&db, "second.xlsx", survey_workbook());

    let cgs = db
        .with_reader(|c| notable_scores(c, first, Instrument::Cgs, 20))
        .unwrap();
    assert_eq!(cgs[0].responses, 3);

    let scores = db
        .with_reader(|c| category_department_scores(c, first, Instrument::Oci, "Power"))
        .unwrap();
    assert_eq!(scores[0].respondents, 3);

    let rows = db
        .with_reader(|c| dimension_distribution(c, first, Dimension::Department, &[]))
        .unwrap();
    assert_eq!(rows[0].count, 3);
}

#[test]
fn file_without_rows_yields_empty_results() {
    let db = setup_db();
    let file = load(&db, "empty.xlsx", MemorySource::new());
    db.with_reader(|c| {
        assert!(dimension_distribution(c, file, Dimension::Gender, &[])?.is_empty());
        assert!(age_gender_crosstab(c, file)?.is_empty());
        assert!(major_education_breakdown(c, file)?.is_empty());
        assert!(response_distribution(c, file, Instrument::Cgs, None)?.is_empty());
        assert!(category_department_scores(c, file, Instrument::Oci, "Power")?.is_empty());
        assert!(department_category_matrix(c, file, Instrument::Oci)?.is_empty());
        assert!(department_profiles(c, file, 8)?.is_empty());
        assert!(notable_scores(c, file, Instrument::Oci, 20)?.is_empty());
        Ok(())
    })
    .unwrap();
}

// ---- Report ----

#[test]
fn comprehensive_report_lists_departments_and_categories() {
    let (db, file) = loaded_db();
    let report = db
        .with_reader(|c| comprehensive_report(c, file, Some("Focus on governance")))
        .unwrap();
    assert!(report.contains("- Total respondents: 5"));
    assert!(report.contains("- Departments: 2"));
    assert!(report.contains("  * IT: 3 (60.0%)"));
    assert!(report.contains("### 2. OCI"));
    assert!(report.contains("#### HR\n- Power: 1.50\n- Achievement: 4.50"));
    assert!(report.contains("### 3. CGS"));
    assert!(report.ends_with("### 4. Requirements\nFocus on governance\n"));

    let plain = db.with_reader(|c| comprehensive_report(c, file, None)).unwrap();
    assert!(!plain.contains("Requirements"));
}

// ---- Rounding ----

proptest! {
    #[test]
    fn percentages_stay_in_range(part in 0i64..10_000, extra in 0i64..10_000) {
        let total = part + extra;
        let p = percentage(part, total);
        prop_assert!((0.0..=100.0).contains(&p));
        prop_assert_eq!(round_to(p, 1), p);
    }

    #[test]
    fn shares_sum_close_to_hundred(counts in proptest::collection::vec(1i64..500, 1..12)) {
        let total: i64 = counts.iter().sum();
        let sum: f64 = counts.iter().map(|c| percentage(*c, total)).sum();
        // Each share is off by at most 0.05 after rounding.
        prop_assert!((sum - 100.0).abs() <= 0.05 * counts.len() as f64 + 1e-9);
    }
}
