//! Department-level scores, profiles, and notable questions.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{params, Connection};
use serde::Serialize;
use statrs::statistics::Statistics;
use survey_core::constants::{
    NOTABLE_HIGH_SCORE, NOTABLE_LOW_SCORE, NOTABLE_MIN_CGS_RESPONSES,
};
use survey_core::errors::StorageError;
use survey_core::types::{FileId, Instrument};
use survey_storage::sqlite_error;

use super::instrument::sort_categories;
use super::{collect_rows, round_to, UNKNOWN_LABEL};

/// Score statistics for one department within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentScore {
    pub department: String,
    pub respondents: usize,
    pub avg_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Sample standard deviation; `None` for a single respondent.
    pub std_score: Option<f64>,
    /// Per-respondent category averages, for box plots.
    #[serde(skip)]
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub department: String,
    pub category: String,
    pub avg_score: f64,
    pub respondent_count: i64,
}

/// Department × category pivot of average scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMatrix {
    pub departments: Vec<String>,
    pub categories: Vec<String>,
    /// `values[department][category]`, `None` where no one answered.
    pub values: Vec<Vec<Option<f64>>>,
}

impl DepartmentMatrix {
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentProfile {
    pub department: String,
    pub count: i64,
    pub genders: String,
    pub age_groups: String,
    pub education_levels: String,
    pub majors: String,
    pub experience_ranges: String,
}

/// A department's average on one question that sits at either extreme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotableScore {
    pub department: String,
    pub survey_id: String,
    pub question_text: Option<String>,
    pub avg_score: f64,
    /// The question's average over the whole file.
    pub question_avg: f64,
    pub responses: i64,
}

/// Per-department statistics of respondents' average answer within `category`.
/// Ordered by average, highest first. All figures are rounded to 2 decimals.
pub fn category_department_scores(
    conn: &Connection,
    file_id: FileId,
    instrument: Instrument,
    category: &str,
) -> Result<Vec<DepartmentScore>, StorageError> {
    let sql = format!(
        "SELECT COALESCE(p.department, '{UNKNOWN_LABEL}'), AVG(r.response)
         FROM {responses} r
         JOIN {questions} q ON q.survey_id = r.survey_id
         JOIN respondents p ON p.respondent_id = r.respondent_id AND p.file_id = r.file_id
         WHERE r.file_id = ?1 AND q.question_category = ?2
         GROUP BY p.respondent_id, p.department",
        responses = instrument.responses_table(),
        questions = instrument.questions_table(),
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    let per_respondent: Vec<(String, f64)> =
        collect_rows(&mut stmt, params![file_id, category], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut by_department: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (department, avg) in per_respondent {
        by_department.entry(department).or_default().push(avg);
    }

    let mut scores: Vec<DepartmentScore> = by_department
        .into_iter()
        .map(|(department, samples)| department_score(department, samples))
        .collect();
    scores.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| a.department.cmp(&b.department))
    });
    Ok(scores)
}

fn department_score(department: String, samples: Vec<f64>) -> DepartmentScore {
    let std_score = (samples.len() > 1).then(|| round_to(samples.iter().std_dev(), 2));
    DepartmentScore {
        respondents: samples.len(),
        avg_score: round_to(samples.iter().mean(), 2),
        min_score: round_to(Statistics::min(samples.iter()), 2),
        max_score: round_to(Statistics::max(samples.iter()), 2),
        std_score,
        department,
        samples,
    }
}

/// Average score and distinct respondents per department and category.
pub fn department_category_matrix(
    conn: &Connection,
    file_id: FileId,
    instrument: Instrument,
) -> Result<Vec<MatrixCell>, StorageError> {
    let sql = format!(
        "SELECT COALESCE(p.department, '{UNKNOWN_LABEL}'), COALESCE(q.question_category, '{UNKNOWN_LABEL}'),
                ROUND(AVG(r.response), 2), COUNT(DISTINCT p.respondent_id)
         FROM {responses} r
         JOIN {questions} q ON q.survey_id = r.survey_id
         JOIN respondents p ON p.respondent_id = r.respondent_id AND p.file_id = r.file_id
         WHERE r.file_id = ?1
         GROUP BY p.department, q.question_category
         ORDER BY p.department, q.question_category",
        responses = instrument.responses_table(),
        questions = instrument.questions_table(),
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    collect_rows(&mut stmt, params![file_id], |row| {
        Ok(MatrixCell {
            department: row.get(0)?,
            category: row.get(1)?,
            avg_score: row.get(2)?,
            respondent_count: row.get(3)?,
        })
    })
}

/// Pivot matrix cells into departments × categories. Departments sort by
/// name; categories in the instrument's display order.
pub fn pivot_matrix(cells: &[MatrixCell], instrument: Instrument) -> DepartmentMatrix {
    let departments: Vec<String> = cells
        .iter()
        .map(|c| c.department.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut categories: Vec<String> = cells
        .iter()
        .map(|c| c.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sort_categories(&mut categories, instrument);

    let mut values = vec![vec![None; categories.len()]; departments.len()];
    for cell in cells {
        let d = departments.iter().position(|d| d == &cell.department);
        let c = categories.iter().position(|c| c == &cell.category);
        if let (Some(d), Some(c)) = (d, c) {
            values[d][c] = Some(cell.avg_score);
        }
    }

    DepartmentMatrix {
        departments,
        categories,
        values,
    }
}

#[derive(Default)]
struct ProfileAcc {
    count: i64,
    genders: BTreeSet<String>,
    age_groups: BTreeSet<String>,
    education_levels: BTreeSet<String>,
    majors: BTreeSet<String>,
    experience_ranges: BTreeSet<String>,
}

fn insert(set: &mut BTreeSet<String>, value: Option<String>) {
    if let Some(v) = value {
        set.insert(v);
    }
}

fn joined(set: BTreeSet<String>) -> String {
    set.into_iter().collect::<Vec<_>>().join(", ")
}

/// Demographic makeup of each department, largest first, at most `limit`.
pub fn department_profiles(
    conn: &Connection,
    file_id: FileId,
    limit: usize,
) -> Result<Vec<DepartmentProfile>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT COALESCE(department, '{UNKNOWN_LABEL}'), gender, age_group, education_level,
                    major, experience_total
             FROM respondents WHERE file_id = ?1"
        ))
        .map_err(sqlite_error)?;
    type ProfileRow = (
        String,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    );
    let rows: Vec<ProfileRow> = collect_rows(&mut stmt, params![file_id], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    })?;

    let mut accs: BTreeMap<String, ProfileAcc> = BTreeMap::new();
    for (department, gender, age, education, major, experience) in rows {
        let acc = accs.entry(department).or_default();
        acc.count += 1;
        insert(&mut acc.genders, gender);
        insert(&mut acc.age_groups, age);
        insert(&mut acc.education_levels, education);
        insert(&mut acc.majors, major);
        insert(&mut acc.experience_ranges, experience);
    }

    let mut profiles: Vec<DepartmentProfile> = accs
        .into_iter()
        .map(|(department, acc)| DepartmentProfile {
            department,
            count: acc.count,
            genders: joined(acc.genders),
            age_groups: joined(acc.age_groups),
            education_levels: joined(acc.education_levels),
            majors: joined(acc.majors),
            experience_ranges: joined(acc.experience_ranges),
        })
        .collect();
    // BTreeMap iteration already sorted by name; the stable sort keeps that
    // as the tie-break.
    profiles.sort_by(|a, b| b.count.cmp(&a.count));
    profiles.truncate(limit);
    Ok(profiles)
}

/// Department × question averages at or above 4.0 or at or below 2.0, with
/// the question's file-wide average. CGS groups need at least 3 responses.
pub fn notable_scores(
    conn: &Connection,
    file_id: FileId,
    instrument: Instrument,
    limit: usize,
) -> Result<Vec<NotableScore>, StorageError> {
    let min_responses = match instrument {
        Instrument::Oci => 1,
        Instrument::Cgs => NOTABLE_MIN_CGS_RESPONSES,
    };
    let sql = format!(
        "WITH dept AS (
             SELECT COALESCE(p.department, '{UNKNOWN_LABEL}') AS department, r.survey_id,
                    ROUND(AVG(r.response), 2) AS avg_score, COUNT(*) AS responses
             FROM {responses} r
             JOIN respondents p ON p.respondent_id = r.respondent_id AND p.file_id = r.file_id
             WHERE r.file_id = ?1
             GROUP BY p.department, r.survey_id
             HAVING COUNT(*) >= ?2
         ),
         total AS (
             SELECT survey_id, ROUND(AVG(response), 2) AS question_avg
             FROM {responses}
             WHERE file_id = ?1
             GROUP BY survey_id
         )
         SELECT d.department, d.survey_id, q.question_text, d.avg_score, t.question_avg, d.responses
         FROM dept d
         JOIN total t ON t.survey_id = d.survey_id
         LEFT JOIN {questions} q ON q.survey_id = d.survey_id
         WHERE d.avg_score >= ?3 OR d.avg_score <= ?4
         ORDER BY d.department, d.avg_score DESC, d.survey_id
         LIMIT ?5",
        responses = instrument.responses_table(),
        questions = instrument.questions_table(),
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    collect_rows(
        &mut stmt,
        params![
            file_id,
            min_responses,
            NOTABLE_HIGH_SCORE,
            NOTABLE_LOW_SCORE,
            limit as i64
        ],
        |row| {
            Ok(NotableScore {
                department: row.get(0)?,
                survey_id: row.get(1)?,
                question_text: row.get(2)?,
                avg_score: row.get(3)?,
                question_avg: row.get(4)?,
                responses: row.get(5)?,
            })
        },
    )
}
