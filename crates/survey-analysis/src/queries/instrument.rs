//! Per-question response distributions for one instrument.

use std::collections::BTreeSet;

use rusqlite::{params, Connection};
use serde::Serialize;
use survey_core::constants::oci_category_rank;
use survey_core::errors::StorageError;
use survey_core::types::{FileId, Instrument};
use survey_storage::queries::questions;
use survey_storage::sqlite_error;

use super::{collect_rows, round_to};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDistributionRow {
    pub category: Option<String>,
    pub survey_id: String,
    pub response: i64,
    pub count: i64,
    /// Share of this value among the question's responses.
    pub percentage: f64,
}

/// Question × response-value matrix of percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePivot {
    pub survey_ids: Vec<String>,
    pub responses: Vec<i64>,
    /// `"<n> - <meaning>"` per entry of `responses`.
    pub columns: Vec<String>,
    /// `values[question][column]`, 0.0 where a value was never chosen.
    pub values: Vec<Vec<f64>>,
}

/// Headline numbers for one category's distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Mean of the per-question weighted means.
    pub mean: f64,
    /// Lowest per-question mean.
    pub min: f64,
    /// Highest per-question mean.
    pub max: f64,
    /// Percent of responses at or above the positive threshold.
    pub positive_ratio: f64,
    pub questions: usize,
    pub responses: i64,
}

/// Categories present in the instrument's catalog. OCI follows the culture
/// style order (unknown labels last, alphabetical); CGS is alphabetical.
pub fn instrument_categories(conn: &Connection, instrument: Instrument) -> Result<Vec<String>, StorageError> {
    let mut categories = questions::distinct_categories(conn, instrument)?;
    sort_categories(&mut categories, instrument);
    Ok(categories)
}

/// Order category labels for display.
pub fn sort_categories(categories: &mut [String], instrument: Instrument) {
    match instrument {
        Instrument::Oci => {
            categories.sort_by(|a, b| {
                oci_category_rank(a)
                    .cmp(&oci_category_rank(b))
                    .then_with(|| a.cmp(b))
            });
        }
        Instrument::Cgs => categories.sort(),
    }
}

/// Response counts per question and value, optionally restricted to one
/// category. Ordered by survey id, then response value.
pub fn response_distribution(
    conn: &Connection,
    file_id: FileId,
    instrument: Instrument,
    category: Option<&str>,
) -> Result<Vec<ResponseDistributionRow>, StorageError> {
    let sql = format!(
        "SELECT q.question_category, r.survey_id, r.response, COUNT(*),
                ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER (PARTITION BY r.survey_id), 1)
         FROM {responses} r
         JOIN {questions} q ON q.survey_id = r.survey_id
         WHERE r.file_id = ?1 AND (?2 IS NULL OR q.question_category = ?2)
         GROUP BY q.question_category, r.survey_id, r.response
         ORDER BY r.survey_id, r.response",
        responses = instrument.responses_table(),
        questions = instrument.questions_table(),
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    collect_rows(&mut stmt, params![file_id, category], |row| {
        Ok(ResponseDistributionRow {
            category: row.get(0)?,
            survey_id: row.get(1)?,
            response: row.get(2)?,
            count: row.get(3)?,
            percentage: row.get(4)?,
        })
    })
}

/// Pivot distribution rows into a question × value matrix. Every value on
/// the instrument's scale gets a column, plus any off-scale value present.
pub fn response_pivot(rows: &[ResponseDistributionRow], instrument: Instrument) -> ResponsePivot {
    let mut survey_ids: Vec<String> = Vec::new();
    for row in rows {
        if !survey_ids.contains(&row.survey_id) {
            survey_ids.push(row.survey_id.clone());
        }
    }

    let responses: Vec<i64> = (1..=i64::from(instrument.scale_max()))
        .chain(rows.iter().map(|r| r.response))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = responses
        .iter()
        .map(|&value| match instrument.response_meaning(value) {
            Some(meaning) => format!("{value} - {meaning}"),
            None => value.to_string(),
        })
        .collect();

    let mut values = vec![vec![0.0; responses.len()]; survey_ids.len()];
    for row in rows {
        let q = survey_ids.iter().position(|id| id == &row.survey_id);
        let c = responses.iter().position(|&v| v == row.response);
        if let (Some(q), Some(c)) = (q, c) {
            values[q][c] = row.percentage;
        }
    }

    ResponsePivot {
        survey_ids,
        responses,
        columns,
        values,
    }
}

/// Summarize a category's distribution; `None` when there are no responses.
pub fn category_summary(rows: &[ResponseDistributionRow], instrument: Instrument) -> Option<CategorySummary> {
    // (survey_id, weighted sum, count) in first-seen order.
    let mut per_question: Vec<(&str, i64, i64)> = Vec::new();
    for row in rows {
        match per_question.iter_mut().find(|(id, _, _)| *id == row.survey_id) {
            Some((_, sum, count)) => {
                *sum += row.response * row.count;
                *count += row.count;
            }
            None => per_question.push((&row.survey_id, row.response * row.count, row.count)),
        }
    }

    let means: Vec<f64> = per_question
        .iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(_, sum, count)| round_to(*sum as f64 / *count as f64, 2))
        .collect();
    if means.is_empty() {
        return None;
    }

    let responses: i64 = rows.iter().map(|r| r.count).sum();
    let threshold = i64::from(instrument.positive_threshold());
    let positive: i64 = rows
        .iter()
        .filter(|r| r.response >= threshold)
        .map(|r| r.count)
        .sum();

    Some(CategorySummary {
        mean: round_to(means.iter().sum::<f64>() / means.len() as f64, 2),
        min: means.iter().copied().fold(f64::INFINITY, f64::min),
        max: means.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        positive_ratio: super::percentage(positive, responses),
        questions: means.len(),
        responses,
    })
}
