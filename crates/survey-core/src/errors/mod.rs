//! Error handling for the survey workspace.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod completion_error;
pub mod config_error;
pub mod error_code;
pub mod ingest_error;
pub mod storage_error;
pub mod survey_error;

pub use analysis_error::AnalysisError;
pub use completion_error::CompletionError;
pub use config_error::ConfigError;
pub use error_code::SurveyErrorCode;
pub use ingest_error::IngestError;
pub use storage_error::StorageError;
pub use survey_error::SurveyError;
