//! Diagnostic logging.
//!
//! User-facing output goes through [`crate::output::OutputFormatter`];
//! tracing events are for diagnosing a run and go to stderr. The filter is
//! read from `NAMETIDY_LOG` (e.g. `NAMETIDY_LOG=debug`) and defaults to
//! `warn`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "NAMETIDY_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `NAMETIDY_LOG`, falling back to `warn` when the
/// variable is unset or not a valid directive.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_logger() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(env_filter())
        .try_init();
}
