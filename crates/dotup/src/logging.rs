//! Logging init: stderr, env-filter overridable.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dotup=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
