//! Configuration system.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod completion_config;
pub mod database_config;
pub mod ingest_config;
pub mod retention_config;
pub mod survey_config;

pub use analysis_config::AnalysisConfig;
pub use completion_config::CompletionConfig;
pub use database_config::DatabaseConfig;
pub use ingest_config::IngestConfig;
pub use retention_config::RetentionConfig;
pub use survey_config::{CliOverrides, SurveyConfig, PROJECT_CONFIG_FILE};
