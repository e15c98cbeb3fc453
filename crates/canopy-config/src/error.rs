//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required config file does not exist.
    #[error("config file {} does not exist", path.display())]
    Missing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A config file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension or format name is neither TOML nor JSON.
    #[error("unsupported config format '{0}', expected toml or json")]
    UnsupportedFormat(String),

    /// TOML syntax or schema error.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or schema error.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// `.env` exists but could not be parsed.
    #[error("cannot load .env: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// An override variable has a value of the wrong type.
    #[error("{var}: {reason}")]
    EnvVar {
        /// Full variable name, prefix included.
        var: String,
        /// What was expected.
        reason: String,
    },

    /// A loaded value fails validation.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted field path, e.g. `client.base_url`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_var(var: &str, reason: impl Into<String>) -> Self {
        Self::EnvVar {
            var: var.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_names_path() {
        let err = ConfigError::Missing {
            path: PathBuf::from("/etc/canopy.toml"),
        };
        assert_eq!(err.to_string(), "config file /etc/canopy.toml does not exist");
    }

    #[test]
    fn test_invalid_field() {
        let err = ConfigError::invalid("client.base_url", "missing host");
        assert_eq!(err.to_string(), "client.base_url: missing host");
        assert_eq!(err.field(), Some("client.base_url"));
    }

    #[test]
    fn test_env_var() {
        let err = ConfigError::env_var("CANOPY__CLIENT__TIMEOUT_MS", "expected integer");
        assert_eq!(err.to_string(), "CANOPY__CLIENT__TIMEOUT_MS: expected integer");
        assert_eq!(err.field(), None);
    }
}
