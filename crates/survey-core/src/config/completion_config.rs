//! Text-completion service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL,
    DEFAULT_COMPLETION_RETRIES, DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_HISTORY_CONTEXT,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompletionConfig {
    /// OpenAI-compatible API root, without the `/chat/completions` suffix.
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Inline key. Prefer `api_key_env`; this exists for local setups.
    pub api_key: Option<String>,
    /// Environment variable read for the key. Default: `OPENAI_API_KEY`.
    pub api_key_env: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// Earlier generated narratives quoted into prompts. Default: 5.
    pub history_context: Option<usize>,
}

impl CompletionConfig {
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPLETION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn effective_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string())
    }

    pub fn effective_api_key_env(&self) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string())
    }

    /// The inline key, else the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(self.effective_api_key_env()).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn effective_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn effective_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_COMPLETION_TIMEOUT_SECS))
    }

    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_COMPLETION_RETRIES)
    }

    pub fn effective_history_context(&self) -> usize {
        self.history_context.unwrap_or(DEFAULT_HISTORY_CONTEXT)
    }
}
