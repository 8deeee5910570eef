//! Application log setup: stderr plus a non-blocking `ww3tool.log` file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*};
use ww3_core::logging::LogLevel;

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "ww3tool.log";

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the app; dropping it flushes the file writer.
pub fn init_logging(log_dir: &Path, level: LogLevel) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(level.env_filter())
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!("Logging to {}", log_dir.join(LOG_FILE_NAME).display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file_and_refuses_second_init() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init_logging(&log_dir, LogLevel::Info).unwrap();
        tracing::info!("bridge logging ready");
        assert!(log_dir.join(LOG_FILE_NAME).exists());

        assert!(init_logging(&log_dir, LogLevel::Debug).is_err());
        drop(guard);
    }
}
