//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-crate log directives.
pub const LOG_ENV_VAR: &str = "SURVEY_LOG";

/// Filter used when `SURVEY_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "survey_core=info,survey_storage=info,survey_ingest=info,\
survey_analysis=info,survey_narrative=info,survey_cli=info";

/// Initialize the tracing subscriber.
///
/// Reads `SURVEY_LOG` for directives, e.g.
/// `SURVEY_LOG=survey_ingest=debug,survey_storage=warn`.
/// Output goes to stderr so report output on stdout stays machine-readable.
///
/// Idempotent: only the first call installs a subscriber. A subscriber set
/// elsewhere beforehand is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
