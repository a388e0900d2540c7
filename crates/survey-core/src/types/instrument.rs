//! Survey instruments and their response scales.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const OCI_MEANINGS: [&str; 5] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];

const CGS_MEANINGS: [&str; 7] = [
    "Strongly disagree",
    "Disagree",
    "Somewhat disagree",
    "Neutral",
    "Somewhat agree",
    "Agree",
    "Strongly agree",
];

const OCI_COLORS: [&str; 5] = ["#FF9999", "#FFB366", "#FFFF99", "#99FF99", "#99CCFF"];

const CGS_COLORS: [&str; 7] = [
    "#FF0000", "#FF6666", "#FFCC66", "#FFFF99", "#99FF99", "#66CC66", "#009900",
];

/// A survey instrument. Each has its own question catalog and response table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// Organizational Culture Inventory, 5-point scale.
    Oci,
    /// Corporate Governance Structure, 7-point scale.
    Cgs,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::Oci, Instrument::Cgs];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oci => "oci",
            Self::Cgs => "cgs",
        }
    }

    pub fn questions_table(self) -> &'static str {
        match self {
            Self::Oci => "oci_questions",
            Self::Cgs => "cgs_questions",
        }
    }

    pub fn responses_table(self) -> &'static str {
        match self {
            Self::Oci => "oci_responses",
            Self::Cgs => "cgs_responses",
        }
    }

    /// Sheet holding the question catalog.
    pub fn question_sheet(self) -> &'static str {
        match self {
            Self::Oci => "OCI_Q",
            Self::Cgs => "CGS_Q",
        }
    }

    /// Sheet holding the responses.
    pub fn response_sheet(self) -> &'static str {
        match self {
            Self::Oci => "OCI_R",
            Self::Cgs => "CGS_R",
        }
    }

    /// Highest response value on the scale (lowest is always 1).
    pub fn scale_max(self) -> u8 {
        match self {
            Self::Oci => 5,
            Self::Cgs => 7,
        }
    }

    /// Responses at or above this value count as positive.
    pub fn positive_threshold(self) -> u8 {
        match self {
            Self::Oci => 4,
            Self::Cgs => 5,
        }
    }

    /// Midpoint of the scale, used to split "above average" answers.
    pub fn midpoint(self) -> f64 {
        (1.0 + f64::from(self.scale_max())) / 2.0
    }

    /// Label for a response value, `None` when off-scale.
    pub fn response_meaning(self, value: i64) -> Option<&'static str> {
        let idx = usize::try_from(value.checked_sub(1)?).ok()?;
        match self {
            Self::Oci => OCI_MEANINGS.get(idx).copied(),
            Self::Cgs => CGS_MEANINGS.get(idx).copied(),
        }
    }

    /// Chart color for a response value. Off-scale values get a neutral gray.
    pub fn response_color(self, value: i64) -> &'static str {
        let idx = usize::try_from(value - 1).ok();
        let color = match self {
            Self::Oci => idx.and_then(|i| OCI_COLORS.get(i)),
            Self::Cgs => idx.and_then(|i| CGS_COLORS.get(i)),
        };
        color.copied().unwrap_or("#CCCCCC")
    }

    pub fn contains(self, value: i64) -> bool {
        (1..=i64::from(self.scale_max())).contains(&value)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Oci => "OCI",
            Self::Cgs => "CGS",
        })
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oci" => Ok(Self::Oci),
            "cgs" => Ok(Self::Cgs),
            other => Err(format!("unknown instrument '{other}' (expected oci or cgs)")),
        }
    }
}
