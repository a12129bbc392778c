//! Tracing setup: stdout always, plus daily log files under
//! [`Config::log_dir`] when file logging is switched on.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "trainer";

/// Keeps the background file writer alive. Drop it last so buffered lines
/// are flushed.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber. Settings problems are reported through
/// tracing once it is up, never silently dropped.
pub fn init_tracing(config: &Config) -> LogGuard {
    let (env_filter, bad_filter) = match EnvFilter::try_new(&config.log_level) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };
    let stdout_layer = fmt::layer().with_target(true);

    let appender = config
        .log_dir
        .as_deref()
        .map(|dir| daily_appender(dir, config.log_retention_days));
    let file = match appender {
        Some(Ok(appender)) => Some(tracing_appender::non_blocking(appender)),
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            None
        }
        None => None,
    };

    let guard = match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            None
        }
    };

    if bad_filter {
        tracing::warn!(log_level = %config.log_level, "invalid log filter, using info");
    }
    if let Some(dir) = config.log_dir.as_deref().filter(|_| guard.is_some()) {
        tracing::info!(dir = %dir.display(), keep_days = config.log_retention_days, "writing log files");
    }
    for deck in &config.ignored_decks {
        tracing::warn!(deck = %deck, "ignoring invalid deck name");
    }

    LogGuard { _file: guard }
}

fn daily_appender(
    dir: &Path,
    keep_days: usize,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(keep_days)
        .build(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_daily_appender_writes_prefixed_files() {
        let dir = TempDir::new().unwrap();
        let mut appender = daily_appender(dir.path(), 3).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("trainer."));
        assert!(names[0].ends_with(".log"));
    }
}
