//! Tracing subscriber set up.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use super::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// Defaults to `info` unless `RUST_LOG` says otherwise. When a log directory is
/// configured, a daily rolling file gets the same events as the console.
/// The returned guard must be held for as long as file logs should be flushed.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer());

    if let Some(directory) = &config.directory {
        let file_appender = tracing_appender::rolling::daily(directory, "milestones.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);
        if registry.with(file_layer).try_init().is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
        return Some(guard);
    }
    if registry.try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    None
}
