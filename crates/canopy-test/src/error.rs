//! Test error types.

use canopy_config::ConfigError;
use canopy_path::PathError;
use thiserror::Error;

/// Errors that can occur while building, sending or inspecting a request.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Header name or value is invalid
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Response body reading failed
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client failed to send the request or read the response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Path expression could not be parsed
    #[error("JSON path error: {0}")]
    Path(#[from] PathError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TestError::InvalidHeader("bad name".to_string());
        assert_eq!(err.to_string(), "Invalid header: bad name");
    }

    #[test]
    fn test_from_path_error() {
        let err: TestError = canopy_path::JsonPath::parse("no.root").unwrap_err().into();
        assert!(matches!(err, TestError::Path(_)));
        assert!(err.to_string().contains("no.root"));
    }

    #[test]
    fn test_from_json_error() {
        let err: TestError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
