//! `surveyctl report ...`

use std::io::Write;

use anyhow::Result;
use survey_analysis::render::builders::{notable_table, profiles_table};
use survey_analysis::Panel;

use super::Session;
use crate::cli::ReportCommand;

pub fn run(session: &Session, out: &mut dyn Write, report: ReportCommand) -> Result<()> {
    let analyzer = session.analyzer();
    analyzer.file(report.file())?;
    let panels: Vec<Panel> = match report {
        ReportCommand::Dimension { file, dimension } => vec![analyzer.distribution_panel(file, dimension)?],
        ReportCommand::Crosstab { file } => vec![analyzer.age_gender_panel(file)?],
        ReportCommand::Major { file } => vec![analyzer.major_education_panel(file)?],
        ReportCommand::Instrument {
            file,
            instrument,
            category,
        } => {
            let categories = match category {
                Some(c) => vec![c],
                None => analyzer.instrument_categories(instrument)?,
            };
            let mut panels = Vec::with_capacity(categories.len() * 2);
            for category in &categories {
                panels.push(analyzer.response_distribution_panel(file, instrument, category)?);
                panels.push(analyzer.department_scores_panel(file, instrument, category)?);
            }
            panels
        }
        ReportCommand::Matrix { file, instrument } => vec![analyzer.department_matrix_panel(file, instrument)?],
        ReportCommand::Profiles { file, limit } => {
            let rows = analyzer.department_profiles(file, limit)?;
            return session.write_rows(out, &profiles_table(&rows), &rows);
        }
        ReportCommand::Notable {
            file,
            instrument,
            limit,
        } => {
            let rows = analyzer.notable_scores(file, instrument, limit)?;
            return session.write_rows(out, &notable_table(&rows), &rows);
        }
    };

    match session.format.table_format() {
        Some(format) => {
            for panel in &panels {
                writeln!(out, "{}", panel.render(format))?;
            }
            Ok(())
        }
        None if panels.len() == 1 => session.write_json(out, &panels[0]),
        None => session.write_json(out, &panels),
    }
}
