//! # survey-cli
//!
//! The `surveyctl` command set: argument definitions, the console event
//! handler, and command implementations that write to any `io::Write`.

pub mod cli;
pub mod commands;
pub mod console;

pub use cli::Cli;
pub use commands::{execute, run};
