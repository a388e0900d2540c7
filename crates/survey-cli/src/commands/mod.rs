//! Command dispatch. Every command writes its result to `out`; progress and
//! logs go to stderr.

mod files;
mod narrative;
mod report;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use survey_analysis::{Analyzer, Table};
use survey_core::events::EventDispatcher;
use survey_core::SurveyConfig;
use survey_narrative::TextCompletion;
use survey_storage::DatabaseManager;

use crate::cli::{Cli, Command, GlobalArgs, OutputFormat};
use crate::console::ConsoleHandler;

/// Resolved config plus an open database for one invocation.
pub struct Session {
    pub root: PathBuf,
    pub config: SurveyConfig,
    pub db: DatabaseManager,
    pub events: EventDispatcher,
    pub format: OutputFormat,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = SurveyConfig::load(&global.root, Some(&global.overrides()))
            .context("failed to load configuration")?;
        let path = config.database.effective_path(&global.root);
        let db = DatabaseManager::from_config(&config.database, &global.root)
            .with_context(|| format!("failed to open database {}", path.display()))?;

        let mut events = EventDispatcher::new();
        events.register(Arc::new(ConsoleHandler));

        Ok(Self {
            root: global.root.clone(),
            config,
            db,
            events,
            format: global.format,
        })
    }

    pub fn analyzer(&self) -> Analyzer<'_> {
        Analyzer::new(&self.db, &self.config.analysis)
    }

    /// `table` in the chosen text format; `rows` as JSON.
    fn write_rows<T: Serialize + ?Sized>(&self, out: &mut dyn Write, table: &Table, rows: &T) -> Result<()> {
        match self.format.table_format() {
            Some(format) => write!(out, "{}", table.render(format))?,
            None => writeln!(out, "{}", serde_json::to_string_pretty(rows)?)?,
        }
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, out: &mut dyn Write, value: &T) -> Result<()> {
        writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }
}

/// Run with the configured chat-completion client.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    execute(cli, out, None)
}

/// Run with `completion` standing in for the configured client when given.
pub fn execute(cli: Cli, out: &mut dyn Write, completion: Option<&dyn TextCompletion>) -> Result<()> {
    let session = Session::open(&cli.global)?;
    match cli.command {
        Command::Init => files::init(&session, out),
        Command::Upload {
            path,
            name,
            no_validate_scales,
        } => files::upload(&session, out, &path, name.as_deref(), no_validate_scales),
        Command::Files { limit } => files::list(&session, out, limit),
        Command::Recent { days, limit } => files::recent(&session, out, days, limit),
        Command::Show { file, rows } => files::show(&session, out, file, rows),
        Command::Delete { file } => files::delete(&session, out, file),
        Command::Maintain => files::maintain(&session, out),
        Command::Config => files::config(&session, out),
        Command::Report { report } => report::run(&session, out, report),
        Command::Narrative { action } => narrative::run(&session, out, action, completion),
        Command::Comprehensive { file, requirements } => {
            narrative::comprehensive(&session, out, file, requirements.as_deref())
        }
    }
}
