//! Prompt text for narrative generation.

use survey_analysis::queries::department::{DepartmentProfile, NotableScore};
use survey_analysis::render::builders::{notable_table, profiles_table};
use survey_analysis::render::format_timestamp;
use survey_core::constants::MAX_ADDITIONAL_PROMPT_CHARS;
use survey_storage::queries::history::HistoryRow;

pub const NARRATIVE_SYSTEM: &str = "You are a data analysis expert.";

pub const OVERALL_SYSTEM: &str = "You are an organization diagnosis expert. \
     Give practical, specific insights grounded in the data.";

const NONE: &str = "none";

/// Earlier narratives as `type (when): text`, blank-line separated.
pub fn format_history(history: &[HistoryRow]) -> String {
    if history.is_empty() {
        return NONE.to_string();
    }
    history
        .iter()
        .map(|h| {
            format!(
                "{} ({}): {}",
                h.analysis_type,
                format_timestamp(h.created_at),
                h.analysis_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// User instructions trimmed to the first 100 characters, or `none`.
pub fn additional_instructions(additional: Option<&str>) -> String {
    match additional.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => text.chars().take(MAX_ADDITIONAL_PROMPT_CHARS).collect(),
        None => NONE.to_string(),
    }
}

/// Prompt for one analysis slot: the data table plus earlier narratives.
pub fn narrative_prompt(subject: &str, data: &str, history: &[HistoryRow]) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("The following is {subject} data:\n\n{data}\n\n"));
    prompt.push_str("Earlier analyses for reference:\n");
    prompt.push_str(&format_history(history));
    prompt.push_str("\n\nAnalyze this data and cover:\n");
    prompt.push_str("1. Main characteristics and patterns\n");
    prompt.push_str("2. Notable or unusual points\n");
    prompt.push_str("3. Implications and suggestions\n");
    prompt.push_str("4. What changed compared with the earlier analyses\n");
    prompt
}

/// Whole-file prompt from department profiles and notable question scores.
pub fn overall_prompt(
    profiles: &[DepartmentProfile],
    oci: &[NotableScore],
    cgs: &[NotableScore],
    additional: Option<&str>,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are an expert in organizational culture and governance. \
         Analyze the following survey data as a whole.\n\n",
    );
    prompt.push_str("1. Respondents by department:\n");
    prompt.push_str(&profiles_table(profiles).to_markdown());
    prompt.push_str("\n2. OCI (organizational culture), high and low scoring items by department:\n");
    prompt.push_str(&notable_table(oci).to_markdown());
    prompt.push_str("\n3. CGS (governance), characteristic responses by department:\n");
    prompt.push_str(&notable_table(cgs).to_markdown());
    prompt.push_str(&format!(
        "\nAdditional considerations: {}\n\n",
        additional_instructions(additional)
    ));
    prompt.push_str(
        "Structure the analysis as:\n\
         1. Respondent composition\n   \
            - headcount by department\n   \
            - main demographic traits\n\
         2. Organizational culture (OCI)\n   \
            - overall culture traits\n   \
            - differences between departments\n   \
            - areas needing improvement\n\
         3. Governance (CGS)\n   \
            - main strengths and weaknesses\n   \
            - characteristic differences between departments\n   \
            - improvement proposals\n\
         4. Overall recommendations\n   \
            - key findings\n   \
            - prioritized improvement tasks\n   \
            - action plan\n",
    );
    prompt
}
