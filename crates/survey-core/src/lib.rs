//! # survey-core
//!
//! Shared foundation for the survey insight workspace: domain types,
//! per-subsystem errors, layered TOML configuration, tracing setup, the
//! event dispatcher, and constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

pub use config::SurveyConfig;
pub use errors::{SurveyError, SurveyErrorCode};
pub use types::{AnalysisKey, AnalysisType, Dimension, FileId, Instrument};
