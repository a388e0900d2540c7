use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use survey_cli::Cli;
use survey_core::errors::{
    AnalysisError, CompletionError, ConfigError, IngestError, StorageError, SurveyError, SurveyErrorCode,
};

/// `[CODE] message` for workspace errors, anywhere in the context chain.
fn coded_message(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SurveyError>() {
            Some(e.display_string())
        } else if let Some(e) = cause.downcast_ref::<AnalysisError>() {
            Some(e.display_string())
        } else if let Some(e) = cause.downcast_ref::<IngestError>() {
            Some(e.display_string())
        } else if let Some(e) = cause.downcast_ref::<StorageError>() {
            Some(e.display_string())
        } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.display_string())
        } else {
            cause.downcast_ref::<CompletionError>().map(|e| e.display_string())
        }
    })
}

fn main() -> ExitCode {
    survey_core::tracing::init_tracing();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = survey_cli::run(cli, &mut out);
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match coded_message(&err) {
                Some(msg) => eprintln!("error: {msg}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
