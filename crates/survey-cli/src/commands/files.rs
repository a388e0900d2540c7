//! Setup, upload, file listing, deletion, and maintenance.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use survey_analysis::render::builders::files_table;
use survey_analysis::render::format_timestamp;
use survey_analysis::{Cell, Table, TableFormat};
use survey_core::config::PROJECT_CONFIG_FILE;
use survey_ingest::{ingest, CalamineSource};
use survey_storage::queries::respondents::RespondentRow;
use survey_storage::queries::responses::ResponseRow;
use survey_storage::retention::RetentionPolicy;
use survey_storage::now_secs;

use super::Session;

const STARTER_CONFIG: &str = r#"# surveyctl project configuration. Every key is optional.

[database]
# path = "survey.db"

[ingest]
# validate_scales = true

[analysis]
# education_order = ["고졸", "전문대졸", "대졸", "석사", "박사"]

[completion]
# model = "gpt-3.5-turbo"
# api_key_env = "OPENAI_API_KEY"

[retention]
# file_days = 30
# narrative_days = 30
"#;

pub fn init(session: &Session, out: &mut dyn Write) -> Result<()> {
    let config_path = session.root.join(PROJECT_CONFIG_FILE);
    if !config_path.exists() {
        std::fs::write(&config_path, STARTER_CONFIG)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        writeln!(out, "wrote {}", config_path.display())?;
    }
    let db_path = session.config.database.effective_path(&session.root);
    writeln!(out, "database ready at {}", db_path.display())?;
    Ok(())
}

pub fn upload(
    session: &Session,
    out: &mut dyn Write,
    path: &Path,
    name: Option<&str>,
    no_validate_scales: bool,
) -> Result<()> {
    let file_name = match name {
        Some(n) => n.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?,
    };
    let mut ingest_config = session.config.ingest.clone();
    if no_validate_scales {
        ingest_config.validate_scales = Some(false);
    }

    let mut source = CalamineSource::open(path)?;
    let report = ingest(&session.db, &file_name, &mut source, &ingest_config, &session.events)?;

    if session.format.table_format().is_some() {
        writeln!(out, "{}", report.file_id)?;
    } else {
        session.write_json(out, &report)?;
    }
    Ok(())
}

pub fn list(session: &Session, out: &mut dyn Write, limit: usize) -> Result<()> {
    let files = session.analyzer().list_files(limit)?;
    session.write_rows(out, &files_table(&files), &files)
}

pub fn recent(session: &Session, out: &mut dyn Write, days: u32, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or_else(|| session.config.retention.effective_recent_file_limit());
    let files = session.analyzer().recent_files(days, limit)?;
    session.write_rows(out, &files_table(&files), &files)
}

fn opt(value: &Option<String>) -> Cell {
    value.as_deref().map_or(Cell::Empty, Cell::text)
}

fn respondents_table(rows: &[RespondentRow]) -> Table {
    let mut table = Table::new(["ID", "Department", "Gender", "Age", "Education", "Major", "Experience", "Certifications"]);
    for r in rows {
        table.push_row(vec![
            Cell::text(&r.respondent_id),
            opt(&r.department),
            opt(&r.gender),
            opt(&r.age_group),
            opt(&r.education_level),
            opt(&r.major),
            opt(&r.experience_total),
            opt(&r.certifications),
        ]);
    }
    table
}

fn responses_table(rows: &[ResponseRow]) -> Table {
    let mut table = Table::new(["Respondent", "Question", "Response", "Meaning"]);
    for r in rows {
        table.push_row(vec![
            Cell::text(&r.respondent_id),
            Cell::text(&r.survey_id),
            Cell::Count(r.response),
            opt(&r.response_meaning),
        ]);
    }
    table
}

pub fn show(session: &Session, out: &mut dyn Write, file_id: i64, rows: usize) -> Result<()> {
    let details = session.analyzer().file_details(file_id, rows)?;
    let Some(format) = session.format.table_format() else {
        return session.write_json(out, &details);
    };

    let f = &details.file;
    let c = &details.counts;
    writeln!(out, "File {}: {} ({})", f.file_id, f.file_name, f.status)?;
    writeln!(out, "Uploaded: {}", format_timestamp(f.uploaded_at))?;
    writeln!(
        out,
        "Rows: {} respondents, {} OCI responses, {} CGS responses, {} narratives\n",
        c.respondents, c.oci_responses, c.cgs_responses, c.narratives
    )?;
    for (title, table) in [
        ("Respondents", respondents_table(&details.respondents)),
        ("OCI responses", responses_table(&details.oci_responses)),
        ("CGS responses", responses_table(&details.cgs_responses)),
    ] {
        if format == TableFormat::Markdown {
            writeln!(out, "### {title}\n")?;
        } else {
            writeln!(out, "{title}")?;
        }
        writeln!(out, "{}", table.render(format))?;
    }
    Ok(())
}

pub fn delete(session: &Session, out: &mut dyn Write, file_id: i64) -> Result<()> {
    session.analyzer().delete_file(file_id)?;
    writeln!(out, "deleted file {file_id}")?;
    Ok(())
}

pub fn maintain(session: &Session, out: &mut dyn Write) -> Result<()> {
    let policy = RetentionPolicy::from(&session.config.retention);
    let report = session.analyzer().apply_retention(&policy, now_secs())?;
    if session.format.table_format().is_none() {
        return session.write_json(out, &report);
    }
    if report.per_table.is_empty() {
        writeln!(out, "nothing to remove")?;
        return Ok(());
    }
    for t in &report.per_table {
        writeln!(out, "{:<32} {:>8}", t.table, t.deleted)?;
    }
    writeln!(out, "{} rows removed in {} ms", report.total_deleted, report.duration_ms)?;
    Ok(())
}

pub fn config(session: &Session, out: &mut dyn Write) -> Result<()> {
    let mut shown = session.config.clone();
    if shown.completion.api_key.is_some() {
        shown.completion.api_key = Some("********".to_string());
    }
    if session.format.table_format().is_none() {
        return session.write_json(out, &shown);
    }
    write!(out, "{}", shown.to_toml()?)?;
    Ok(())
}
