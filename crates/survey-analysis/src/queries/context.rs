//! The data table quoted into a narrative prompt for one analysis slot.

use rusqlite::Connection;
use survey_core::errors::StorageError;
use survey_core::types::{AnalysisKey, AnalysisType, Dimension, FileId, Instrument};

use super::demographics::{age_gender_crosstab, dimension_distribution, major_education_breakdown};
use super::department::{
    category_department_scores, department_category_matrix, department_profiles, pivot_matrix,
};
use crate::render::builders::{
    age_gender_table, department_scores_table, distribution_table, major_education_table,
    matrix_table, profiles_table, DEPARTMENT_MATRIX_ITEM,
};
use crate::render::Table;

/// Which aggregation feeds a narrative slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    Distribution(Dimension),
    AgeGender,
    MajorEducation,
    CategoryScores { instrument: Instrument, category: String },
    DepartmentMatrix(Instrument),
    Profiles,
}

impl ContextKind {
    /// Resolve a key to its context. `None` for respondent/education items
    /// with no matching view.
    pub fn for_key(key: &AnalysisKey) -> Option<Self> {
        let item = key.item.as_str();
        match key.analysis_type {
            AnalysisType::Respondent | AnalysisType::Education => {
                if (key.analysis_type, item) == (AnalysisType::Respondent, "age") {
                    return Some(Self::AgeGender);
                }
                if (key.analysis_type, item) == (AnalysisType::Education, "major") {
                    return Some(Self::MajorEducation);
                }
                Dimension::ALL
                    .into_iter()
                    .find(|d| d.analysis_slot() == (key.analysis_type, item))
                    .map(Self::Distribution)
            }
            AnalysisType::Oci | AnalysisType::Cgs => {
                let instrument = key.analysis_type.instrument()?;
                if item == DEPARTMENT_MATRIX_ITEM {
                    Some(Self::DepartmentMatrix(instrument))
                } else {
                    Some(Self::CategoryScores {
                        instrument,
                        category: item.to_string(),
                    })
                }
            }
            AnalysisType::Comprehensive | AnalysisType::Overall => Some(Self::Profiles),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Distribution(d) => format!("{} distribution", d.title().to_lowercase()),
            Self::AgeGender => "age group by gender".to_string(),
            Self::MajorEducation => "major by education level".to_string(),
            Self::CategoryScores { instrument, category } => {
                format!("{instrument} '{category}' scores by department")
            }
            Self::DepartmentMatrix(instrument) => format!("{instrument} category averages by department"),
            Self::Profiles => "department profiles".to_string(),
        }
    }
}

/// Build the context table for `kind`.
pub fn dimension_context(
    conn: &Connection,
    file_id: FileId,
    kind: &ContextKind,
    education_order: &[String],
    profile_limit: usize,
) -> Result<Table, StorageError> {
    Ok(match kind {
        ContextKind::Distribution(dimension) => {
            let rows = dimension_distribution(conn, file_id, *dimension, education_order)?;
            distribution_table(*dimension, &rows)
        }
        ContextKind::AgeGender => age_gender_table(&age_gender_crosstab(conn, file_id)?),
        ContextKind::MajorEducation => major_education_table(&major_education_breakdown(conn, file_id)?),
        ContextKind::CategoryScores { instrument, category } => {
            department_scores_table(&category_department_scores(conn, file_id, *instrument, category)?)
        }
        ContextKind::DepartmentMatrix(instrument) => {
            let cells = department_category_matrix(conn, file_id, *instrument)?;
            matrix_table(&pivot_matrix(&cells, *instrument))
        }
        ContextKind::Profiles => profiles_table(&department_profiles(conn, file_id, profile_limit)?),
    })
}
