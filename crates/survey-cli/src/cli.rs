//! Command-line arguments for `surveyctl`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use survey_analysis::TableFormat;
use survey_core::config::CliOverrides;
use survey_core::types::{AnalysisType, Dimension, FileId, Instrument};

#[derive(Parser, Debug)]
#[command(name = "surveyctl", about = "Survey upload, reporting, and narrative management", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project root holding `survey.toml` and, by default, the database.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Database file, overriding config.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Completion model, overriding config.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Completion API root, overriding config.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format for reports and listings.
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl GlobalArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            database_path: self.db.clone(),
            completion_model: self.model.clone(),
            completion_base_url: self.base_url.clone(),
            validate_scales: None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markdown,
    Csv,
    Json,
}

impl OutputFormat {
    /// Table rendering for non-JSON output.
    pub fn table_format(self) -> Option<TableFormat> {
        match self {
            Self::Text => Some(TableFormat::Text),
            Self::Markdown => Some(TableFormat::Markdown),
            Self::Csv => Some(TableFormat::Csv),
            Self::Json => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and a starter `survey.toml`.
    Init,

    /// Load a workbook (.xlsx) as a new file.
    Upload {
        path: PathBuf,
        /// Stored file name; defaults to the path's file name.
        #[arg(long)]
        name: Option<String>,
        /// Accept responses outside the instrument scale.
        #[arg(long)]
        no_validate_scales: bool,
    },

    /// List uploaded files, newest first.
    Files {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Files uploaded in the last few days.
    Recent {
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Row counts and the first rows of one file.
    Show {
        file: FileId,
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Delete a file and everything loaded from it.
    Delete { file: FileId },

    /// Print a report panel.
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },

    /// Read, edit, and generate narratives.
    Narrative {
        #[command(subcommand)]
        action: NarrativeCommand,
    },

    /// Deterministic whole-file report, also stored as the
    /// `comprehensive / report` narrative.
    Comprehensive {
        file: FileId,
        #[arg(long)]
        requirements: Option<String>,
    },

    /// Apply the retention policy.
    Maintain,

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Respondent counts per value of one dimension.
    Dimension { file: FileId, dimension: Dimension },

    /// Age group by gender.
    Crosstab { file: FileId },

    /// Major by education level.
    Major { file: FileId },

    /// Response distributions and department scores for one instrument.
    Instrument {
        file: FileId,
        instrument: Instrument,
        /// Limit to one category; every category otherwise.
        #[arg(long)]
        category: Option<String>,
    },

    /// Department by category averages.
    Matrix { file: FileId, instrument: Instrument },

    /// Department headcounts and demographic mix.
    Profiles {
        file: FileId,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Unusually high or low question averages per department.
    Notable {
        file: FileId,
        instrument: Instrument,
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl ReportCommand {
    pub fn file(&self) -> FileId {
        match self {
            Self::Dimension { file, .. }
            | Self::Crosstab { file }
            | Self::Major { file }
            | Self::Instrument { file, .. }
            | Self::Matrix { file, .. }
            | Self::Profiles { file, .. }
            | Self::Notable { file, .. } => *file,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    pub file: FileId,
    pub analysis_type: AnalysisType,
    pub item: String,
}

#[derive(Subcommand, Debug)]
pub enum NarrativeCommand {
    /// Print the stored text of a slot.
    Get {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Overwrite a slot. Reads stdin when no text is given.
    Set {
        #[command(flatten)]
        key: KeyArgs,
        text: Option<String>,
    },

    /// Generate a slot's text with the completion service.
    Generate {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Generate the whole-file summary.
    Overall {
        file: FileId,
        /// Extra instructions; only the first 100 characters are used.
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Offline template summary of one category's department scores.
    Summarize {
        file: FileId,
        instrument: Instrument,
        category: String,
    },

    /// Every narrative stored for a file.
    List { file: FileId },

    /// Recently generated narratives across files.
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    Delete {
        #[command(flatten)]
        key: KeyArgs,
    },
}
