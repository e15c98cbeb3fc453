//! Structured logging for Canopy API tests.
//!
//! Request summaries, response dumps and failed expectations are emitted as
//! `tracing` events. This crate wires those events to a subscriber:
//!
//! - **Pretty** output for reading a failing test locally
//! - **JSON** output for CI log collectors
//! - **Compact** single-line output
//!
//! Test binaries call [`init_test_logging`] from every test; only the first
//! call installs a subscriber and the rest are no-ops.
//!
//! # Example
//!
//! ```rust,ignore
//! use canopy_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(http.method = "GET", http.url = "http://localhost/users", "Request sent");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
