//! `surveyctl narrative ...` and `surveyctl comprehensive`.

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use survey_analysis::render::format_timestamp;
use survey_analysis::{Cell, Table};
use survey_core::types::{AnalysisKey, FileId};
use survey_narrative::{
    summarize_category_scores, ChatCompletionClient, Narrative, NarrativeGenerator, NarrativeStore,
    TextCompletion,
};
use survey_storage::queries::history::HistoryRow;

use super::Session;
use crate::cli::{KeyArgs, NarrativeCommand, OutputFormat};

impl From<KeyArgs> for AnalysisKey {
    fn from(args: KeyArgs) -> Self {
        AnalysisKey::new(args.file, args.analysis_type, args.item)
    }
}

fn narratives_table(narratives: &[Narrative]) -> Table {
    let mut table = Table::new(["Type", "Item", "Updated", "Characters"]);
    for n in narratives {
        table.push_row(vec![
            Cell::text(n.key.analysis_type.as_str()),
            Cell::text(&n.key.item),
            Cell::text(format_timestamp(n.touched_at())),
            Cell::Count(n.text.chars().count() as i64),
        ]);
    }
    table
}

fn history_table(rows: &[HistoryRow]) -> Table {
    let mut table = Table::new(["ID", "File", "Type", "Item", "Model", "Created"]);
    for h in rows {
        table.push_row(vec![
            Cell::Count(h.history_id),
            Cell::Count(h.file_id),
            Cell::text(&h.analysis_type),
            Cell::text(&h.analysis_item),
            h.model.as_deref().map_or(Cell::Empty, Cell::text),
            Cell::text(format_timestamp(h.created_at)),
        ]);
    }
    table
}

fn write_narrative(session: &Session, out: &mut dyn Write, narrative: &Narrative) -> Result<()> {
    if session.format.table_format().is_some() {
        writeln!(out, "{}", narrative.text)?;
        Ok(())
    } else {
        session.write_json(out, narrative)
    }
}

pub fn run(
    session: &Session,
    out: &mut dyn Write,
    action: NarrativeCommand,
    completion: Option<&dyn TextCompletion>,
) -> Result<()> {
    let store = NarrativeStore::new(&session.db, &session.events);
    match action {
        NarrativeCommand::Get { key } => {
            let key = AnalysisKey::from(key);
            match store.load(&key)? {
                Some(narrative) => write_narrative(session, out, &narrative),
                None if session.format.table_format().is_some() => Ok(()),
                None => session.write_json(out, &serde_json::Value::Null),
            }
        }
        NarrativeCommand::Set { key, text } => {
            let key = AnalysisKey::from(key);
            session.analyzer().file(key.file_id)?;
            let text = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read narrative text from stdin")?;
                    buf
                }
            };
            store.save(&key, text.trim_end())?;
            writeln!(out, "saved {key}")?;
            Ok(())
        }
        NarrativeCommand::Generate { key } => {
            let key = AnalysisKey::from(key);
            let narrative = with_generator(session, completion, |g| Ok(g.generate(&key)?))?;
            write_narrative(session, out, &narrative)
        }
        NarrativeCommand::Overall { file, prompt } => {
            let narrative = with_generator(session, completion, |g| Ok(g.generate_overall(file, prompt.as_deref())?))?;
            write_narrative(session, out, &narrative)
        }
        NarrativeCommand::Summarize {
            file,
            instrument,
            category,
        } => {
            let analyzer = session.analyzer();
            analyzer.file(file)?;
            let scores = analyzer.category_department_scores(file, instrument, &category)?;
            write!(out, "{}", summarize_category_scores(&scores, instrument, &category))?;
            Ok(())
        }
        NarrativeCommand::List { file } => {
            session.analyzer().file(file)?;
            let narratives = store.list(file)?;
            session.write_rows(out, &narratives_table(&narratives), &narratives)
        }
        NarrativeCommand::History { limit } => {
            let rows = store.history(limit)?;
            session.write_rows(out, &history_table(&rows), &rows)?;
            if matches!(session.format, OutputFormat::Text | OutputFormat::Markdown) {
                writeln!(out, "{} of {} generated narratives", rows.len(), store.history_len()?)?;
            }
            Ok(())
        }
        NarrativeCommand::Delete { key } => {
            let key = AnalysisKey::from(key);
            if !store.delete(&key)? {
                bail!("no narrative stored for {key}");
            }
            writeln!(out, "deleted {key}")?;
            Ok(())
        }
    }
}

/// Build a generator over `completion`, or the configured chat client.
fn with_generator<T>(
    session: &Session,
    completion: Option<&dyn TextCompletion>,
    f: impl FnOnce(&NarrativeGenerator<'_>) -> Result<T>,
) -> Result<T> {
    let chat;
    let client: &dyn TextCompletion = match completion {
        Some(c) => c,
        None => {
            chat = ChatCompletionClient::from_config(&session.config.completion)?;
            &chat
        }
    };
    let generator = NarrativeGenerator::new(
        &session.db,
        session.analyzer(),
        client,
        &session.config.completion,
        &session.events,
    );
    f(&generator)
}

pub fn comprehensive(session: &Session, out: &mut dyn Write, file: FileId, requirements: Option<&str>) -> Result<()> {
    let report = session.analyzer().comprehensive_report(file, requirements)?;
    let store = NarrativeStore::new(&session.db, &session.events);
    store.save(&AnalysisKey::comprehensive(file), &report)?;
    if session.format.table_format().is_some() {
        write!(out, "{report}")?;
        Ok(())
    } else {
        session.write_json(out, &serde_json::json!({ "file_id": file, "report": report }))
    }
}
