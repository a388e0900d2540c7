//! Keys identifying one editable narrative slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{FileId, Instrument};

/// The family a narrative belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Respondent,
    Education,
    Oci,
    Cgs,
    Comprehensive,
    Overall,
}

impl AnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Respondent => "respondent",
            Self::Education => "education",
            Self::Oci => "oci",
            Self::Cgs => "cgs",
            Self::Comprehensive => "comprehensive",
            Self::Overall => "overall",
        }
    }

    pub fn instrument(self) -> Option<Instrument> {
        match self {
            Self::Oci => Some(Instrument::Oci),
            Self::Cgs => Some(Instrument::Cgs),
            _ => None,
        }
    }
}

impl From<Instrument> for AnalysisType {
    fn from(instrument: Instrument) -> Self {
        match instrument {
            Instrument::Oci => Self::Oci,
            Instrument::Cgs => Self::Cgs,
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "respondent" => Ok(Self::Respondent),
            "education" => Ok(Self::Education),
            "oci" => Ok(Self::Oci),
            "cgs" => Ok(Self::Cgs),
            "comprehensive" => Ok(Self::Comprehensive),
            "overall" => Ok(Self::Overall),
            other => Err(format!("unknown analysis type '{other}'")),
        }
    }
}

/// `(file, analysis type, item)`: one narrative slot, e.g. `(3, oci, "Power")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisKey {
    pub file_id: FileId,
    pub analysis_type: AnalysisType,
    pub item: String,
}

impl AnalysisKey {
    /// Surrounding whitespace is dropped from `item`.
    pub fn new(file_id: FileId, analysis_type: AnalysisType, item: impl Into<String>) -> Self {
        let mut item = item.into();
        let trimmed = item.trim();
        if trimmed.len() != item.len() {
            item = trimmed.to_string();
        }
        Self {
            file_id,
            analysis_type,
            item,
        }
    }

    /// The whole-file AI summary slot.
    pub fn overall(file_id: FileId) -> Self {
        Self::new(file_id, AnalysisType::Overall, "summary")
    }

    /// The deterministic comprehensive report slot.
    pub fn comprehensive(file_id: FileId) -> Self {
        Self::new(file_id, AnalysisType::Comprehensive, "report")
    }
}

impl fmt::Display for AnalysisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} / {} / {}", self.file_id, self.analysis_type, self.item)
    }
}
