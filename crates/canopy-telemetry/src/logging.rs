//! Subscriber setup for request and assertion logging.
//!
//! # Example
//!
//! ```rust,ignore
//! use canopy_telemetry::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::default();
//! init_logging(&config)?;
//!
//! tracing::info!(http.method = "GET", http.status_code = 200, "Response received");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line, human-readable output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Log level or filter directive (e.g., "info", "canopy_test=debug").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Let `RUST_LOG` override `level` when it is set.
    pub respect_rust_log: bool,

    /// Route output through libtest's capture instead of stderr.
    pub test_writer: bool,

    /// Whether to emit ANSI colour codes.
    pub ansi: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Pretty,
            respect_rust_log: true,
            test_writer: false,
            ansi: true,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with verbose, readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            file_line_info: true,
            ..Self::default()
        }
    }

    /// Creates a CI configuration with JSON output and no colour.
    #[must_use]
    pub fn ci() -> Self {
        Self {
            format: LogFormat::Json,
            ansi: false,
            ..Self::default()
        }
    }

    /// Creates a configuration whose output is captured per test by libtest.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Compact,
            test_writer: true,
            ansi: false,
            ..Self::default()
        }
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a bad level directive and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = if config.respect_rust_log {
        EnvFilter::try_from_default_env().or_else(|_| create_env_filter(&config.level))?
    } else {
        create_env_filter(&config.level)?
    };

    let writer = if config.test_writer {
        BoxMakeWriter::new(TestWriter::new())
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(config.ansi)
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_thread_ids(config.thread_ids)
        .with_target(config.include_target);

    match config.format {
        LogFormat::Json => install(fmt_layer.json().with_filter(filter)),
        LogFormat::Pretty => install(fmt_layer.pretty().with_filter(filter)),
        LogFormat::Compact => install(fmt_layer.compact().with_filter(filter)),
    }
}

/// Installs test-friendly logging once per process.
///
/// Safe to call at the start of every test; calls after the first are ignored.
pub fn init_test_logging() {
    // A second install fails with "already set", which is expected here.
    let _ = init_logging(&LogConfig::for_tests());
}

fn install<L>(layer: L) -> TelemetryResult<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a string.
///
/// # Arguments
///
/// * `filter` - Filter string (e.g., "info", "canopy_test=debug,reqwest=warn")
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        directive: filter.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_ci_config() {
        let config = LogConfig::ci();
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);
    }

    #[test]
    fn test_for_tests_config() {
        let config = LogConfig::for_tests();
        assert!(config.test_writer);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_create_env_filter_valid() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("canopy_test=debug,reqwest=warn").is_ok());
    }

    #[test]
    fn test_create_env_filter_invalid() {
        let err = create_env_filter("canopy_test=notalevel").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };

        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_init_test_logging_is_repeatable() {
        init_test_logging();
        init_test_logging();
    }
}
