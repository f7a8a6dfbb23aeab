use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "LINK_CHECK_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Logs go to stderr; stdout carries the JSON-RPC stream and must stay clean.
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
