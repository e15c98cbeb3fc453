//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Invalid log filter directive.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("already set".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = TelemetryError::InvalidFilter {
            directive: "=bogus=".to_string(),
            reason: "invalid".to_string(),
        };
        assert!(err.to_string().contains("=bogus="));
    }
}
