//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber, setting up the pipeline
//! from `tracing` macros to a rotating JSON log file.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file created inside the data directory.
pub const LOG_FILE_NAME: &str = "classdesk.log";

/// Resolves the filter directive: `RUST_LOG`, then `trace_level`, then
/// `info`.
fn filter_directive(config: &Config) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config.trace_level.clone())
        .unwrap_or_else(|| "info".to_string())
}

/// Initializes the tracing subscriber with a JSON file layer.
///
/// Sets up a subscriber pipeline that:
/// 1. Filters spans and events by the resolved level
/// 2. Formats events as JSON lines with the current span
/// 3. Writes to `classdesk.log` in the data directory, rotated at 10 MB
///    with 3 backups
///
/// # Initialization Behavior
///
/// - Creates data directory if it doesn't exist
/// - Silently returns if directory creation fails (logging is optional)
/// - An unparseable level falls back to `info`
/// - Idempotent: Safe to call multiple times (only first call takes effect)
///
/// # Example
///
/// ```rust,no_run
/// use classdesk::observability::init_tracing;
/// use classdesk::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let directive = filter_directive(config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = FileWriter::new(data_dir.join(LOG_FILE_NAME));
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(writer);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    if subscriber.try_init().is_ok() {
        tracing::info!(level = %directive, dir = %data_dir.display(), "tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_level_applies_without_rust_log() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = Config {
            trace_level: Some("debug".to_string()),
            ..Config::default()
        };
        assert_eq!(filter_directive(&config), "debug");
        assert_eq!(filter_directive(&Config::default()), "info");
    }
}
