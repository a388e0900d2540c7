//! Respondent demographic dimensions that can be grouped on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A respondent column usable as a group-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Department,
    Gender,
    AgeGroup,
    EducationLevel,
    Major,
    Certification,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Department,
        Dimension::Gender,
        Dimension::AgeGroup,
        Dimension::EducationLevel,
        Dimension::Major,
        Dimension::Certification,
    ];

    /// Column in `respondents`. Only ever one of these literals, so it is
    /// safe to splice into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Gender => "gender",
            Self::AgeGroup => "age_group",
            Self::EducationLevel => "education_level",
            Self::Major => "major",
            Self::Certification => "certifications",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Gender => "Gender",
            Self::AgeGroup => "Age group",
            Self::EducationLevel => "Education level",
            Self::Major => "Major",
            Self::Certification => "Certification",
        }
    }

    /// Narrative slot `(type, item)` this dimension's panel writes to.
    pub fn analysis_slot(self) -> (super::AnalysisType, &'static str) {
        use super::AnalysisType;
        match self {
            Self::Department => (AnalysisType::Respondent, "department"),
            Self::Gender => (AnalysisType::Respondent, "gender"),
            Self::AgeGroup => (AnalysisType::Respondent, "age"),
            Self::Certification => (AnalysisType::Respondent, "certification"),
            Self::EducationLevel => (AnalysisType::Education, "level"),
            Self::Major => (AnalysisType::Education, "major"),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "department" | "dept" => Ok(Self::Department),
            "gender" => Ok(Self::Gender),
            "age" | "age_group" => Ok(Self::AgeGroup),
            "education" | "education_level" | "level" => Ok(Self::EducationLevel),
            "major" => Ok(Self::Major),
            "certification" | "certifications" | "cert" => Ok(Self::Certification),
            other => Err(format!("unknown dimension '{other}'")),
        }
    }
}
