//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, CompletionConfig, DatabaseConfig, IngestConfig, RetentionConfig};
use crate::constants::MAX_READ_POOL_SIZE;
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "survey.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SURVEY_*`)
/// 3. Project config (`survey.toml` in project root)
/// 4. User config (`~/.survey/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurveyConfig {
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    pub analysis: AnalysisConfig,
    pub completion: CompletionConfig,
    pub retention: RetentionConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub completion_model: Option<String>,
    pub completion_base_url: Option<String>,
    pub validate_scales: Option<bool>,
}

impl SurveyConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SurveyConfig) -> Result<(), ConfigError> {
        if let Some(size) = config.database.read_pool_size {
            if !(1..=MAX_READ_POOL_SIZE).contains(&size) {
                return Err(invalid(
                    "database.read_pool_size",
                    format!("must be between 1 and {MAX_READ_POOL_SIZE}"),
                ));
            }
        }
        if let Some(t) = config.completion.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(invalid("completion.temperature", "must be between 0.0 and 2.0"));
            }
        }
        if config.completion.max_tokens == Some(0) {
            return Err(invalid("completion.max_tokens", "must be greater than 0"));
        }
        if config.completion.timeout_secs == Some(0) {
            return Err(invalid("completion.timeout_secs", "must be greater than 0"));
        }
        if config.retention.file_days == Some(0) {
            return Err(invalid("retention.file_days", "must be greater than 0"));
        }
        if config.retention.narrative_days == Some(0) {
            return Err(invalid("retention.narrative_days", "must be greater than 0"));
        }
        if config
            .analysis
            .education_order
            .iter()
            .any(|level| level.trim().is_empty())
        {
            return Err(invalid("analysis.education_order", "entries must not be blank"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.survey/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".survey").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut SurveyConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SurveyConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut SurveyConfig, other: &SurveyConfig) {
        // Database
        merge_opt(&mut base.database.path, &other.database.path);
        merge_opt(&mut base.database.read_pool_size, &other.database.read_pool_size);

        // Ingest
        merge_opt(&mut base.ingest.validate_scales, &other.ingest.validate_scales);
        merge_opt(
            &mut base.ingest.infer_oci_categories,
            &other.ingest.infer_oci_categories,
        );

        // Analysis
        if !other.analysis.education_order.is_empty() {
            base.analysis.education_order = other.analysis.education_order.clone();
        }
        merge_opt(&mut base.analysis.profile_limit, &other.analysis.profile_limit);
        merge_opt(&mut base.analysis.notable_limit, &other.analysis.notable_limit);

        // Completion
        let (b, o) = (&mut base.completion, &other.completion);
        merge_opt(&mut b.base_url, &o.base_url);
        merge_opt(&mut b.model, &o.model);
        merge_opt(&mut b.api_key, &o.api_key);
        merge_opt(&mut b.api_key_env, &o.api_key_env);
        merge_opt(&mut b.temperature, &o.temperature);
        merge_opt(&mut b.max_tokens, &o.max_tokens);
        merge_opt(&mut b.timeout_secs, &o.timeout_secs);
        merge_opt(&mut b.max_retries, &o.max_retries);
        merge_opt(&mut b.history_context, &o.history_context);

        // Retention
        merge_opt(&mut base.retention.file_days, &other.retention.file_days);
        merge_opt(&mut base.retention.narrative_days, &other.retention.narrative_days);
        merge_opt(
            &mut base.retention.recent_file_limit,
            &other.retention.recent_file_limit,
        );
    }

    /// Apply environment variable overrides.
    /// Pattern: `SURVEY_DATABASE_PATH`, `SURVEY_COMPLETION_MODEL`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut SurveyConfig) {
        if let Ok(val) = std::env::var("SURVEY_DATABASE_PATH") {
            config.database.path = Some(val);
        }
        if let Some(v) = env_parse("SURVEY_DATABASE_READ_POOL_SIZE") {
            config.database.read_pool_size = Some(v);
        }
        if let Some(v) = env_parse("SURVEY_INGEST_VALIDATE_SCALES") {
            config.ingest.validate_scales = Some(v);
        }
        if let Ok(val) = std::env::var("SURVEY_COMPLETION_BASE_URL") {
            config.completion.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("SURVEY_COMPLETION_MODEL") {
            config.completion.model = Some(val);
        }
        if let Some(v) = env_parse("SURVEY_COMPLETION_TEMPERATURE") {
            config.completion.temperature = Some(v);
        }
        if let Some(v) = env_parse("SURVEY_COMPLETION_MAX_TOKENS") {
            config.completion.max_tokens = Some(v);
        }
        if let Some(v) = env_parse("SURVEY_RETENTION_FILE_DAYS") {
            config.retention.file_days = Some(v);
        }
        if let Some(v) = env_parse("SURVEY_RETENTION_NARRATIVE_DAYS") {
            config.retention.narrative_days = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut SurveyConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.database_path {
            config.database.path = Some(v.clone());
        }
        if let Some(ref v) = cli.completion_model {
            config.completion.model = Some(v.clone());
        }
        if let Some(ref v) = cli.completion_base_url {
            config.completion.base_url = Some(v.clone());
        }
        if let Some(v) = cli.validate_scales {
            config.ingest.validate_scales = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn merge_opt<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
    if other.is_some() {
        base.clone_from(other);
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
