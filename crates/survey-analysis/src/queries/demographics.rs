//! Respondent demographics: single-dimension distributions and crosstabs.

use rusqlite::{params, Connection};
use serde::Serialize;
use survey_core::errors::StorageError;
use survey_core::types::{Dimension, FileId};
use survey_storage::sqlite_error;

use super::{collect_rows, UNKNOWN_LABEL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub label: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGenderRow {
    pub age_group: String,
    pub gender: String,
    pub count: i64,
    /// Share within the age group.
    pub gender_percentage: f64,
    /// Share of all respondents in the file.
    pub total_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorEducationRow {
    pub major: String,
    pub education_level: String,
    pub count: i64,
    pub percentage: f64,
}

/// Respondent counts per value of `dimension`.
///
/// Ordered by count (descending) except age groups, which sort by label, and
/// education levels, which follow `education_order` with unlisted levels last.
/// Certification counts skip respondents without one.
pub fn dimension_distribution(
    conn: &Connection,
    file_id: FileId,
    dimension: Dimension,
    education_order: &[String],
) -> Result<Vec<DistributionRow>, StorageError> {
    let column = dimension.column();
    let filter = if dimension == Dimension::Certification {
        format!("AND {column} IS NOT NULL")
    } else {
        String::new()
    };
    let order = if dimension == Dimension::AgeGroup {
        "label ASC"
    } else {
        "count DESC, label ASC"
    };
    let sql = format!(
        "SELECT COALESCE({column}, '{UNKNOWN_LABEL}') AS label,
                COUNT(*) AS count,
                ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER (), 1) AS percentage
         FROM respondents
         WHERE file_id = ?1 {filter}
         GROUP BY label
         ORDER BY {order}"
    );

    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_error)?;
    let mut rows = collect_rows(&mut stmt, params![file_id], |row| {
        Ok(DistributionRow {
            label: row.get(0)?,
            count: row.get(1)?,
            percentage: row.get(2)?,
        })
    })?;

    if dimension == Dimension::EducationLevel {
        sort_by_rank(&mut rows, education_order);
    }
    Ok(rows)
}

/// Stable sort by position in `order`; labels not listed keep their relative
/// order after every listed one.
pub fn sort_by_rank(rows: &mut [DistributionRow], order: &[String]) {
    rows.sort_by_key(|row| {
        order
            .iter()
            .position(|level| level == &row.label)
            .unwrap_or(order.len())
    });
}

/// Age group × gender counts, ordered by age group then gender.
pub fn age_gender_crosstab(conn: &Connection, file_id: FileId) -> Result<Vec<AgeGenderRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT COALESCE(age_group, '{UNKNOWN_LABEL}'), COALESCE(gender, '{UNKNOWN_LABEL}'),
                    COUNT(*),
                    ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER (PARTITION BY age_group), 1),
                    ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER (), 1)
             FROM respondents
             WHERE file_id = ?1
             GROUP BY age_group, gender
             ORDER BY age_group, gender"
        ))
        .map_err(sqlite_error)?;
    collect_rows(&mut stmt, params![file_id], |row| {
        Ok(AgeGenderRow {
            age_group: row.get(0)?,
            gender: row.get(1)?,
            count: row.get(2)?,
            gender_percentage: row.get(3)?,
            total_percentage: row.get(4)?,
        })
    })
}

/// Major × education level counts, largest groups first.
pub fn major_education_breakdown(
    conn: &Connection,
    file_id: FileId,
) -> Result<Vec<MajorEducationRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT COALESCE(major, '{UNKNOWN_LABEL}'), COALESCE(education_level, '{UNKNOWN_LABEL}'),
                    COUNT(*),
                    ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER (), 1)
             FROM respondents
             WHERE file_id = ?1
             GROUP BY major, education_level
             ORDER BY COUNT(*) DESC, major, education_level"
        ))
        .map_err(sqlite_error)?;
    collect_rows(&mut stmt, params![file_id], |row| {
        Ok(MajorEducationRow {
            major: row.get(0)?,
            education_level: row.get(1)?,
            count: row.get(2)?,
            percentage: row.get(3)?,
        })
    })
}

/// Per-major totals derived from a breakdown, largest first.
pub fn major_totals(rows: &[MajorEducationRow]) -> Vec<DistributionRow> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    for row in rows {
        match totals.iter_mut().find(|(major, _)| major == &row.major) {
            Some((_, count)) => *count += row.count,
            None => totals.push((row.major.clone(), row.count)),
        }
    }
    let total: i64 = totals.iter().map(|(_, c)| c).sum();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
        .into_iter()
        .map(|(label, count)| DistributionRow {
            percentage: super::percentage(count, total),
            label,
            count,
        })
        .collect()
}
