//! Structured logging infrastructure for DropKey.
//!
//! Log level comes from `RUST_LOG`, defaulting to `info`. Key material,
//! signatures and ciphertext are never logged; use a key fingerprint instead.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info";

fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// Build a filter from `RUST_LOG`-style directives, falling back to `info`
/// when they are absent or do not parse.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Initialize the logging system with human-readable output.
///
/// # Example
/// ```no_run
/// use dropkey_core::logging;
///
/// logging::init();
/// tracing::info!("Application started");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize the logging system with JSON output for production environments.
///
/// # Example
/// ```no_run
/// use dropkey_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "dropkey-api", "Service started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Pick the output format from configuration.
pub fn init_from_config(config: &crate::config::LoggingConfig) {
    if config.json {
        init_json();
    } else {
        init();
    }
}
