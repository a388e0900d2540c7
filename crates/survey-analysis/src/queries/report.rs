//! Deterministic whole-file text report.

use rusqlite::Connection;
use survey_core::errors::StorageError;
use survey_core::types::{Dimension, FileId, Instrument};

use super::demographics::dimension_distribution;
use super::department::{department_category_matrix, pivot_matrix};
use crate::render::format_count;

/// Markdown report: respondent totals per department, each instrument's
/// per-department category averages, and an optional requirements section.
pub fn comprehensive_report(
    conn: &Connection,
    file_id: FileId,
    requirements: Option<&str>,
) -> Result<String, StorageError> {
    let departments = dimension_distribution(conn, file_id, Dimension::Department, &[])?;
    let total: i64 = departments.iter().map(|d| d.count).sum();

    let mut out = String::new();
    out.push_str("### 1. Respondents\n");
    out.push_str(&format!("- Total respondents: {}\n", format_count(total)));
    out.push_str(&format!("- Departments: {}\n", departments.len()));
    if !departments.is_empty() {
        out.push_str("- By department:\n");
        for d in &departments {
            out.push_str(&format!("  * {}: {} ({:.1}%)\n", d.label, format_count(d.count), d.percentage));
        }
    }

    for (section, instrument) in [(2, Instrument::Oci), (3, Instrument::Cgs)] {
        out.push_str(&format!("\n### {section}. {instrument}\n"));
        let cells = department_category_matrix(conn, file_id, instrument)?;
        if cells.is_empty() {
            out.push_str(&format!("No {instrument} responses.\n"));
            continue;
        }
        let matrix = pivot_matrix(&cells, instrument);
        for (department, values) in matrix.departments.iter().zip(&matrix.values) {
            out.push_str(&format!("\n#### {department}\n"));
            for (category, value) in matrix.categories.iter().zip(values) {
                if let Some(score) = value {
                    out.push_str(&format!("- {category}: {score:.2}\n"));
                }
            }
        }
    }

    if let Some(req) = requirements.map(str::trim).filter(|r| !r.is_empty()) {
        out.push_str(&format!("\n### 4. Requirements\n{req}\n"));
    }
    Ok(out)
}
