use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::adaptive::DECISION_LOG_TARGET;
use crate::config::LogConfig;

const SERVICE_LOG_FILE: &str = "cogplay-backend.log";
const DECISION_LOG_FILE: &str = "decisions.jsonl";

/// Keeps the background log writers alive; drop it only at shutdown.
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Stdout always; a daily service log with `ENABLE_FILE_LOGS`; a daily JSON-lines
/// decision audit with `ADAPT_DECISION_LOG`. The decision audit ignores `RUST_LOG`
/// and records every decision event.
pub fn init_tracing(config: &LogConfig) -> LogGuards {
    let mut guards = Vec::new();

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_filter(env_filter(&config.level));

    let file_layer = if config.file_logs {
        rolling_writer(&config.dir, SERVICE_LOG_FILE).map(|(writer, guard)| {
            guards.push(guard);
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(env_filter(&config.level))
        })
    } else {
        None
    };

    let decision_layer = if config.decision_log {
        rolling_writer(&config.dir, DECISION_LOG_FILE).map(|(writer, guard)| {
            guards.push(guard);
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(false)
                .with_span_list(false)
                .with_filter(decision_filter())
        })
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .with(decision_layer)
        .init();

    LogGuards { _guards: guards }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn decision_filter() -> Targets {
    Targets::new().with_target(DECISION_LOG_TARGET, Level::DEBUG)
}

fn rolling_writer(dir: &Path, file_name: &str) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("failed to create log directory {}: {err}", dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_filter_only_passes_decisions() {
        let filter = decision_filter();
        assert!(filter.would_enable(DECISION_LOG_TARGET, &Level::DEBUG));
        assert!(filter.would_enable(DECISION_LOG_TARGET, &Level::WARN));
        assert!(!filter.would_enable("cogplay_backend::routes::adapt", &Level::INFO));
        assert!(!filter.would_enable(DECISION_LOG_TARGET, &Level::TRACE));
    }
}
