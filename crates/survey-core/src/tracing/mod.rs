//! Logging for the survey workspace.
//! `tracing` with an `EnvFilter` read from `SURVEY_LOG`.

pub mod fields;
pub mod setup;

pub use setup::{init_tracing, DEFAULT_FILTER, LOG_ENV_VAR};
