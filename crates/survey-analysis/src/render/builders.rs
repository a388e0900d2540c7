//! Query rows to tables and dashboard panels.

use survey_core::types::{AnalysisKey, AnalysisType, Dimension, FileId, Instrument};
use survey_storage::queries::files::FileRow;

use crate::queries::demographics::{major_totals, AgeGenderRow, DistributionRow, MajorEducationRow};
use crate::queries::department::{DepartmentMatrix, DepartmentProfile, DepartmentScore, NotableScore};
use crate::queries::instrument::{category_summary, response_pivot, ResponseDistributionRow, ResponsePivot};
use crate::queries::round_to;

use super::chart::{BarMode, ChartSpec, Series};
use super::panel::{Metric, Panel};
use super::table::{Cell, Table};
use super::format_timestamp;

/// Narrative item used for an instrument's department × category view.
pub const DEPARTMENT_MATRIX_ITEM: &str = "departments";

const DONUT_HOLE: f64 = 0.4;

fn labels<T>(rows: &[T], f: impl Fn(&T) -> &str) -> Vec<String> {
    rows.iter().map(|r| f(r).to_string()).collect()
}

/// Unique values in first-seen order.
fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

fn top_metrics(noun: &str, total: i64, top: Option<(&str, f64)>) -> Vec<Metric> {
    let mut metrics = vec![Metric::new(format!("Total {noun}"), Cell::Count(total))];
    if let Some((label, share)) = top {
        metrics.push(Metric::new("Most common", Cell::text(label)));
        metrics.push(Metric::new("Most common share", Cell::Percent(share)));
    }
    metrics
}

// ---- Demographics ----

/// Label, count, share, and running share columns.
pub fn distribution_table(dimension: Dimension, rows: &[DistributionRow]) -> Table {
    let mut table = Table::new([dimension.title(), "Count", "Share", "Cumulative"]);
    for (row, cumulative) in rows.iter().zip(cumulative_shares(rows)) {
        table.push_row(vec![
            Cell::text(&row.label),
            Cell::Count(row.count),
            Cell::Percent(row.percentage),
            Cell::Percent(cumulative),
        ]);
    }
    table
}

fn cumulative_shares(rows: &[DistributionRow]) -> Vec<f64> {
    let mut running = 0.0;
    rows.iter()
        .map(|r| {
            running += r.percentage;
            round_to(running, 1)
        })
        .collect()
}

pub fn distribution_panel(file_id: FileId, dimension: Dimension, rows: &[DistributionRow]) -> Panel {
    let total: i64 = rows.iter().map(|r| r.count).sum();
    // `rev` so ties resolve to the earliest row.
    let top = rows
        .iter()
        .rev()
        .max_by_key(|r| r.count)
        .map(|r| (r.label.as_str(), r.percentage));
    let names = labels(rows, |r| r.label.as_str());
    let counts: Vec<f64> = rows.iter().map(|r| r.count as f64).collect();
    let (analysis_type, item) = dimension.analysis_slot();

    let mut panel = Panel::new(format!("{} distribution", dimension.title()));
    for metric in top_metrics("respondents", total, top) {
        panel = panel.with_metric(metric);
    }
    panel
        .with_table(distribution_table(dimension, rows))
        .with_chart(
            ChartSpec::pie(format!("{} share", dimension.title()), DONUT_HOLE)
                .with_series(Series::new("count", names.clone(), counts.clone())),
        )
        .with_chart(
            ChartSpec::bar(format!("Respondents by {}", dimension.title().to_lowercase()), BarMode::Group)
                .with_axes(dimension.title(), "Respondents")
                .with_series(Series::new("count", names.clone(), counts)),
        )
        .with_chart(
            ChartSpec::line(format!("Cumulative share by {}", dimension.title().to_lowercase()))
                .with_axes(dimension.title(), "Cumulative share (%)")
                .with_series(Series::new("cumulative", names, cumulative_shares(rows))),
        )
        .with_narrative_key(AnalysisKey::new(file_id, analysis_type, item))
}

pub fn age_gender_table(rows: &[AgeGenderRow]) -> Table {
    let mut table = Table::new(["Age group", "Gender", "Count", "Share in age group", "Share of total"]);
    for row in rows {
        table.push_row(vec![
            Cell::text(&row.age_group),
            Cell::text(&row.gender),
            Cell::Count(row.count),
            Cell::Percent(row.gender_percentage),
            Cell::Percent(row.total_percentage),
        ]);
    }
    table
}

pub fn age_gender_panel(file_id: FileId, rows: &[AgeGenderRow]) -> Panel {
    let ages = unique(rows.iter().map(|r| r.age_group.as_str()));
    let genders = unique(rows.iter().map(|r| r.gender.as_str()));
    let total: i64 = rows.iter().map(|r| r.count).sum();

    let age_totals: Vec<(String, i64, f64)> = ages
        .iter()
        .map(|age| {
            let in_age = rows.iter().filter(|r| &r.age_group == age);
            let count: i64 = in_age.clone().map(|r| r.count).sum();
            let share: f64 = in_age.map(|r| r.total_percentage).sum();
            (age.clone(), count, round_to(share, 1))
        })
        .collect();
    let top = age_totals
        .iter()
        .rev()
        .max_by_key(|(_, count, _)| *count)
        .map(|(age, _, share)| (age.as_str(), *share));

    let mut bars = ChartSpec::bar("Age group by gender", BarMode::Stack)
        .with_axes("Age group", "Respondents")
        .with_secondary_axis("Share (%)");
    for gender in &genders {
        let values = ages
            .iter()
            .map(|age| {
                rows.iter()
                    .find(|r| &r.age_group == age && &r.gender == gender)
                    .map_or(0.0, |r| r.count as f64)
            })
            .collect();
        bars = bars.with_series(Series::new(gender.clone(), ages.clone(), values));
    }
    bars = bars.with_series(
        Series::new("share", ages.clone(), age_totals.iter().map(|(_, _, s)| *s).collect())
            .with_color("black")
            .as_overlay_line(),
    );

    let mut panel = Panel::new("Age group × gender");
    for metric in top_metrics("respondents", total, top) {
        panel = panel.with_metric(metric);
    }
    panel
        .with_table(age_gender_table(rows))
        .with_chart(bars)
        .with_narrative_key(AnalysisKey::new(file_id, AnalysisType::Respondent, "age"))
}

pub fn major_education_table(rows: &[MajorEducationRow]) -> Table {
    let mut table = Table::new(["Major", "Education level", "Count", "Share"]);
    for row in rows {
        table.push_row(vec![
            Cell::text(&row.major),
            Cell::text(&row.education_level),
            Cell::Count(row.count),
            Cell::Percent(row.percentage),
        ]);
    }
    table
}

pub fn major_education_panel(file_id: FileId, rows: &[MajorEducationRow], education_order: &[String]) -> Panel {
    let totals = major_totals(rows);
    let total: i64 = totals.iter().map(|t| t.count).sum();
    let majors = labels(&totals, |t| t.label.as_str());
    let mut levels = unique(rows.iter().map(|r| r.education_level.as_str()));
    levels.sort_by_key(|l| {
        education_order
            .iter()
            .position(|o| o == l)
            .unwrap_or(education_order.len())
    });

    let mut bars = ChartSpec::bar("Education level by major", BarMode::Stack)
        .with_axes("Major", "Respondents")
        .with_secondary_axis("Share (%)");
    for level in &levels {
        let values = majors
            .iter()
            .map(|major| {
                rows.iter()
                    .find(|r| &r.major == major && &r.education_level == level)
                    .map_or(0.0, |r| r.count as f64)
            })
            .collect();
        bars = bars.with_series(Series::new(level.clone(), majors.clone(), values));
    }
    bars = bars.with_series(
        Series::new("share", majors.clone(), totals.iter().map(|t| t.percentage).collect())
            .with_color("black")
            .as_overlay_line(),
    );

    let mut panel = Panel::new("Major × education level");
    for metric in top_metrics(
        "respondents",
        total,
        totals.first().map(|t| (t.label.as_str(), t.percentage)),
    ) {
        panel = panel.with_metric(metric);
    }
    panel
        .with_table(major_education_table(rows))
        .with_chart(bars)
        .with_narrative_key(AnalysisKey::new(file_id, AnalysisType::Education, "major"))
}

// ---- Instruments ----

pub fn response_pivot_table(pivot: &ResponsePivot) -> Table {
    let mut table = Table::new(std::iter::once("Question".to_string()).chain(pivot.columns.iter().cloned()));
    for (survey_id, values) in pivot.survey_ids.iter().zip(&pivot.values) {
        let mut row = vec![Cell::text(survey_id)];
        row.extend(values.iter().map(|v| Cell::Percent(*v)));
        table.push_row(row);
    }
    table
}

/// Stacked per-question bars by response value, the pivot table, and the
/// category's headline numbers.
pub fn response_distribution_panel(
    file_id: FileId,
    instrument: Instrument,
    category: &str,
    rows: &[ResponseDistributionRow],
) -> Panel {
    let pivot = response_pivot(rows, instrument);
    let mut bars = ChartSpec::bar(format!("{category}: responses per question"), BarMode::Stack)
        .with_axes("Question", "Share of responses (%)");
    for (col, (&value, name)) in pivot.responses.iter().zip(&pivot.columns).enumerate() {
        let values: Vec<f64> = pivot.values.iter().map(|v| v[col]).collect();
        if values.iter().all(|v| *v == 0.0) {
            continue;
        }
        bars = bars.with_series(
            Series::new(name.clone(), pivot.survey_ids.clone(), values)
                .with_color(instrument.response_color(value)),
        );
    }

    let mut panel = Panel::new(format!("{instrument} {category}"));
    if let Some(summary) = category_summary(rows, instrument) {
        panel = panel
            .with_metric(
                Metric::new("Category average", Cell::Score(summary.mean))
                    .with_detail(format!("max {:.2} / min {:.2}", summary.max, summary.min)),
            )
            .with_metric(
                Metric::new("Positive responses", Cell::Percent(summary.positive_ratio))
                    .with_detail(format!("other {:.1}%", round_to(100.0 - summary.positive_ratio, 1))),
            );
    }
    panel
        .with_table(response_pivot_table(&pivot))
        .with_chart(bars)
        .with_narrative_key(AnalysisKey::new(file_id, instrument.into(), category))
}

pub fn department_scores_table(scores: &[DepartmentScore]) -> Table {
    let mut table = Table::new(["Department", "Respondents", "Average", "Min", "Max", "Std dev"]);
    for s in scores {
        table.push_row(vec![
            Cell::text(&s.department),
            Cell::Count(s.respondents as i64),
            Cell::Score(s.avg_score),
            Cell::Score(s.min_score),
            Cell::Score(s.max_score),
            Cell::opt_score(s.std_score),
        ]);
    }
    table
}

pub fn department_scores_panel(
    file_id: FileId,
    instrument: Instrument,
    category: &str,
    scores: &[DepartmentScore],
) -> Panel {
    let departments = labels(scores, |s| s.department.as_str());
    let averages: Vec<f64> = scores.iter().map(|s| s.avg_score).collect();

    let mut boxes = ChartSpec::box_plot(format!("{category}: score spread by department"))
        .with_axes("Department", "Average score");
    for s in scores {
        boxes = boxes.with_series(Series::new(s.department.clone(), Vec::new(), s.samples.clone()));
    }

    let mut panel = Panel::new(format!("{instrument} {category} by department"))
        .with_metric(Metric::new("Departments", Cell::Count(scores.len() as i64)));
    if let (Some(best), Some(worst)) = (scores.first(), scores.last()) {
        panel = panel
            .with_metric(Metric::new("Highest", Cell::text(&best.department)).with_detail(format!("{:.2}", best.avg_score)))
            .with_metric(Metric::new("Lowest", Cell::text(&worst.department)).with_detail(format!("{:.2}", worst.avg_score)))
            .with_metric(Metric::new("Spread", Cell::Score(round_to(best.avg_score - worst.avg_score, 2))));
    }
    panel
        .with_table(department_scores_table(scores))
        .with_chart(
            ChartSpec::bar(format!("{category}: average by department"), BarMode::Group)
                .with_axes("Department", "Average score")
                .with_series(Series::new("average", departments, averages)),
        )
        .with_chart(boxes)
        .with_narrative_key(AnalysisKey::new(file_id, instrument.into(), category))
}

pub fn matrix_table(matrix: &DepartmentMatrix) -> Table {
    let mut table = Table::new(std::iter::once("Department".to_string()).chain(matrix.categories.iter().cloned()));
    for (department, values) in matrix.departments.iter().zip(&matrix.values) {
        let mut row = vec![Cell::text(department)];
        row.extend(values.iter().map(|v| Cell::opt_score(*v)));
        table.push_row(row);
    }
    table
}

/// Grouped bars (one series per category) and a radar per department.
pub fn department_matrix_panel(file_id: FileId, instrument: Instrument, matrix: &DepartmentMatrix) -> Panel {
    let mut bars = ChartSpec::bar(format!("{instrument} category averages by department"), BarMode::Group)
        .with_axes("Department", "Average score");
    for (c, category) in matrix.categories.iter().enumerate() {
        let values = matrix.values.iter().map(|row| row[c].unwrap_or(0.0)).collect();
        bars = bars.with_series(Series::new(category.clone(), matrix.departments.clone(), values));
    }

    let mut radar = ChartSpec::radar(format!("{instrument} department profiles"));
    for (department, row) in matrix.departments.iter().zip(&matrix.values) {
        let values = row.iter().map(|v| v.unwrap_or(0.0)).collect();
        radar = radar.with_series(Series::new(department.clone(), matrix.categories.clone(), values));
    }

    Panel::new(format!("{instrument} department × category"))
        .with_metric(Metric::new("Departments", Cell::Count(matrix.departments.len() as i64)))
        .with_metric(Metric::new("Categories", Cell::Count(matrix.categories.len() as i64)))
        .with_table(matrix_table(matrix))
        .with_chart(bars)
        .with_chart(radar)
        .with_narrative_key(AnalysisKey::new(file_id, instrument.into(), DEPARTMENT_MATRIX_ITEM))
}

// ---- Context tables ----

pub fn profiles_table(profiles: &[DepartmentProfile]) -> Table {
    let mut table = Table::new([
        "Department",
        "Respondents",
        "Genders",
        "Age groups",
        "Education levels",
        "Majors",
        "Experience",
    ]);
    for p in profiles {
        table.push_row(vec![
            Cell::text(&p.department),
            Cell::Count(p.count),
            Cell::text(&p.genders),
            Cell::text(&p.age_groups),
            Cell::text(&p.education_levels),
            Cell::text(&p.majors),
            Cell::text(&p.experience_ranges),
        ]);
    }
    table
}

pub fn notable_table(scores: &[NotableScore]) -> Table {
    let mut table = Table::new(["Department", "Question", "Text", "Average", "File average", "Responses"]);
    for s in scores {
        table.push_row(vec![
            Cell::text(&s.department),
            Cell::text(&s.survey_id),
            s.question_text.as_deref().map_or(Cell::Empty, Cell::text),
            Cell::Score(s.avg_score),
            Cell::Score(s.question_avg),
            Cell::Count(s.responses),
        ]);
    }
    table
}

pub fn files_table(files: &[FileRow]) -> Table {
    let mut table = Table::new(["ID", "File", "Status", "Uploaded"]);
    for f in files {
        table.push_row(vec![
            Cell::Count(f.file_id),
            Cell::text(&f.file_name),
            Cell::text(&f.status),
            Cell::text(format_timestamp(f.uploaded_at)),
        ]);
    }
    table
}
