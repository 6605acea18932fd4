// ABOUTME: Builds the tracing subscriber for one command invocation
// Callers install it with tracing::subscriber::with_default rather than globally

use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that replaces the default.
pub const LOG_ENV: &str = "HIVE_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "hive=debug"
    } else {
        "hive=info"
    }
}

/// Human-oriented log lines on stderr: level and message, no timestamps.
pub fn subscriber(verbose: bool) -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
                .with_writer(std::io::stderr),
        )
        .with(filter)
}
