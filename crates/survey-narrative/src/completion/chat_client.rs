//! Blocking client for an OpenAI-compatible `/chat/completions` endpoint,
//! with retry, exponential backoff, and a request timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use survey_core::config::CompletionConfig;
use survey_core::errors::CompletionError;

use super::{CompletionRequest, TextCompletion};

/// Transport settings for [`ChatCompletionClient`].
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Resolved at call time; `None` fails every request with `MissingApiKey`.
    pub api_key: Option<String>,
    /// Named in the `MissingApiKey` error.
    pub api_key_env: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self::from(&CompletionConfig::default())
    }
}

impl From<&CompletionConfig> for ChatClientConfig {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            base_url: config.effective_base_url(),
            api_key: config.resolve_api_key(),
            api_key_env: config.effective_api_key_env(),
            timeout: config.effective_timeout(),
            max_retries: config.effective_max_retries(),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl ChatClientConfig {
    /// Sleep before retry `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Outcome of one HTTP attempt.
enum Attempt {
    Done(String),
    Retry(String),
}

#[derive(Debug)]
pub struct ChatCompletionClient {
    config: ChatClientConfig,
    http: reqwest::blocking::Client,
}

impl ChatCompletionClient {
    /// Fails only when the HTTP client itself cannot be built (TLS backend).
    pub fn new(config: ChatClientConfig) -> Result<Self, CompletionError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| CompletionError::Network { reason: e.to_string() })?;
        Ok(Self { config, http })
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        Self::new(ChatClientConfig::from(config))
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    fn send_once(
        &self,
        url: &str,
        api_key: &str,
        body: &ChatRequest<'_>,
    ) -> Result<Attempt, CompletionError> {
        let resp = match self.http.post(url).bearer_auth(api_key).json(body).send() {
            Ok(resp) => resp,
            Err(e) => return Ok(Attempt::Retry(e.to_string())),
        };

        let status = resp.status();
        if status.is_success() {
            let parsed: ChatResponse = resp
                .json()
                .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
            let text = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or(CompletionError::EmptyCompletion)?;
            return Ok(Attempt::Done(text));
        }
        if status.is_client_error() {
            return Err(CompletionError::Rejected {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(Attempt::Retry(format!("HTTP {status}")))
    }
}

impl TextCompletion for ChatCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::MissingApiKey {
                env_var: self.config.api_key_env.clone(),
            })?;

        let url = self.config.endpoint();
        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut last_err = String::new();
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.backoff_for(attempt);
                tracing::debug!(
                    attempt,
                    max_retries = self.config.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "completion: retrying"
                );
                std::thread::sleep(backoff);
            }
            match self.send_once(&url, api_key, &body)? {
                Attempt::Done(text) => return Ok(text),
                Attempt::Retry(reason) => {
                    tracing::warn!(attempt, error = %reason, "completion request failed");
                    last_err = reason;
                }
            }
        }

        Err(CompletionError::RetriesExhausted {
            attempts: self.config.max_retries + 1,
            last_error: last_err,
        })
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}
