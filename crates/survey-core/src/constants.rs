//! Shared constants for the survey workspace.

/// Workspace version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default database file name, created next to the project config.
pub const DEFAULT_DATABASE_FILE: &str = "survey.db";

/// Default number of pooled read connections.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Upper bound on pooled read connections.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Default chat model for narrative generation.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the completion API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_COMPLETION_RETRIES: u32 = 3;

/// How many earlier generated narratives are quoted back into a prompt.
pub const DEFAULT_HISTORY_CONTEXT: usize = 5;

/// Max characters kept from user-supplied extra instructions.
pub const MAX_ADDITIONAL_PROMPT_CHARS: usize = 100;

/// Department rows included in whole-file prompts.
pub const DEFAULT_PROFILE_LIMIT: usize = 8;

/// Notable-score rows included per instrument in whole-file prompts.
pub const DEFAULT_NOTABLE_LIMIT: usize = 20;

/// Uploaded files older than this are purged by maintenance.
pub const DEFAULT_FILE_RETENTION_DAYS: u32 = 30;

/// Narratives created longer ago than this are purged by maintenance.
pub const DEFAULT_NARRATIVE_RETENTION_DAYS: u32 = 30;

/// Rows shown by the recent-uploads listing.
pub const DEFAULT_RECENT_FILE_LIMIT: usize = 20;

/// Question-level averages at or above this are "notably high".
pub const NOTABLE_HIGH_SCORE: f64 = 4.0;

/// Question-level averages at or below this are "notably low".
pub const NOTABLE_LOW_SCORE: f64 = 2.0;

/// Minimum CGS responses per (department, question) for it to be notable.
pub const NOTABLE_MIN_CGS_RESPONSES: i64 = 3;

/// Default ordering of education levels in distribution reports.
pub const DEFAULT_EDUCATION_ORDER: [&str; 5] = ["고졸", "전문대졸", "대졸", "석사", "박사"];

/// One culture style of the OCI instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CultureStyle {
    /// English style name, also matched inside stored category labels.
    pub name: &'static str,
    /// Keyword that appears in survey ids belonging to this style.
    pub keyword: &'static str,
    /// Category label used when the catalog leaves the category blank.
    pub label: &'static str,
}

/// The twelve OCI culture styles in reporting order.
pub const OCI_CULTURE_STYLES: [CultureStyle; 12] = [
    CultureStyle { name: "Humanistic-Helpful", keyword: "인간적", label: "인간적-도움 (Humanistic-Helpful)" },
    CultureStyle { name: "Affiliative", keyword: "친화적", label: "친화적 (Affiliative)" },
    CultureStyle { name: "Approval", keyword: "승인", label: "승인 (Approval)" },
    CultureStyle { name: "Conventional", keyword: "전통적", label: "전통적 (Conventional)" },
    CultureStyle { name: "Dependent", keyword: "의존적", label: "의존적 (Dependent)" },
    CultureStyle { name: "Avoidance", keyword: "회피적", label: "회피적 (Avoidance)" },
    CultureStyle { name: "Oppositional", keyword: "반대적", label: "반대적 (Oppositional)" },
    CultureStyle { name: "Power", keyword: "권력", label: "권력 (Power)" },
    CultureStyle { name: "Competitive", keyword: "경쟁", label: "경쟁적 (Competitive)" },
    CultureStyle { name: "Competence/Perfectionistic", keyword: "능력", label: "유능/완벽주의적 (Competence/Perfectionistic)" },
    CultureStyle { name: "Achievement", keyword: "성취", label: "성취 (Achievement)" },
    CultureStyle { name: "Self-Actualizing", keyword: "자아", label: "자기 실현적 (Self-Actualizing)" },
];

/// Infer the OCI category label from a survey id by keyword.
/// Falls back to the survey id itself.
pub fn infer_oci_category(survey_id: &str) -> String {
    OCI_CULTURE_STYLES
        .iter()
        .find(|style| survey_id.contains(style.keyword))
        .map(|style| style.label.to_string())
        .unwrap_or_else(|| survey_id.to_string())
}

/// Reporting rank of an OCI category label; unknown labels rank after all
/// canonical styles.
pub fn oci_category_rank(category: &str) -> usize {
    let lower = category.to_lowercase();
    OCI_CULTURE_STYLES
        .iter()
        .position(|style| {
            category == style.label
                || lower == style.name.to_lowercase()
                || lower.contains(&format!("({})", style.name.to_lowercase()))
                || category.starts_with(style.keyword)
        })
        .unwrap_or(OCI_CULTURE_STYLES.len())
}
