//! Text-completion (narrative generation) errors.

use super::error_code::{self, SurveyErrorCode};

/// Errors talking to the external text-completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("No API key configured (set {env_var})")]
    MissingApiKey { env_var: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("All {attempts} attempts failed: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion returned no text")]
    EmptyCompletion,
}

impl SurveyErrorCode for CompletionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => error_code::MISSING_API_KEY,
            _ => error_code::COMPLETION_ERROR,
        }
    }
}
