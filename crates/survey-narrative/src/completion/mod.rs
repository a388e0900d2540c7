//! Text completion behind a trait so the store can be driven by a fake.

pub mod chat_client;

pub use chat_client::{ChatClientConfig, ChatCompletionClient};

use survey_core::config::CompletionConfig;
use survey_core::errors::CompletionError;

/// One single-turn chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// A request using the configured model and sampling settings.
    pub fn from_config(config: &CompletionConfig, system: &str, prompt: String) -> Self {
        Self {
            model: config.effective_model(),
            system: system.to_string(),
            prompt,
            temperature: config.effective_temperature(),
            max_tokens: config.effective_max_tokens(),
        }
    }
}

/// Produces text for a prompt.
pub trait TextCompletion: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    fn name(&self) -> &str;
}
