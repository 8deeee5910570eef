//! Logging setup for the WW3 tool.
//!
//! The core only emits `tracing` events. Binaries (or the bridge) install a
//! subscriber once at startup with [`init_tracing`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl LogLevel {
    /// Parse the `LOG_LEVEL` config value. Unknown values fall back to info.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    /// Filter directive for this level.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Build an env filter: `RUST_LOG` wins, else this level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.as_filter_str()))
    }
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falls back to `default_level`, writes to stderr.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing(default_level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(default_level.env_filter())
        .try_init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_values_map_to_levels() {
        assert_eq!(LogLevel::from_config("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_config(" warning "), LogLevel::Warn);
        assert_eq!(LogLevel::from_config("verbose"), LogLevel::Info);
    }

    #[test]
    fn level_to_filter_works() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn repeated_init_is_ignored() {
        init_tracing(LogLevel::Warn);
        init_tracing(LogLevel::Debug);
        tracing::warn!("still logging after a second init");
    }
}
