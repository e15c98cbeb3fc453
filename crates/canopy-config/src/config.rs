//! Main configuration types.
//!
//! This module provides the top-level [`CanopyConfig`] struct and its builder.

use http::Uri;
use serde::{Deserialize, Serialize};

use crate::{ClientConfig, LogFormat, LoggingConfig};

/// Complete Canopy configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use canopy_config::CanopyConfig;
///
/// let config = CanopyConfig::default();
/// assert_eq!(config.client.base_url, "http://localhost:8080");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CanopyConfig {
    /// HTTP client configuration.
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CanopyConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_config::{CanopyConfig, ClientConfig};
    ///
    /// let config = CanopyConfig::builder()
    ///     .client(ClientConfig {
    ///         base_url: "http://127.0.0.1:3000".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.client.base_url, "http://127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> CanopyConfigBuilder {
        CanopyConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - The base URL is not an absolute `http`/`https` URL
    /// - The timeout is zero
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        let uri: Uri = self.client.base_url.parse().map_err(|e| {
            crate::ConfigError::invalid("client.base_url", format!("invalid URL: {e}"))
        })?;

        match uri.scheme_str() {
            Some("http" | "https") => {}
            Some(other) => {
                return Err(crate::ConfigError::invalid(
                    "client.base_url",
                    format!("unsupported scheme '{other}', expected http or https"),
                ))
            }
            None => {
                return Err(crate::ConfigError::invalid(
                    "client.base_url",
                    "must be an absolute URL with a scheme",
                ))
            }
        }

        if uri.authority().is_none() {
            return Err(crate::ConfigError::invalid(
                "client.base_url",
                "missing host",
            ));
        }

        if self.client.timeout_ms == 0 {
            return Err(crate::ConfigError::invalid(
                "client.timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled {
            canopy_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| crate::ConfigError::invalid("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Debug-level, human-readable logs with response dumps on failure.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_config::CanopyConfig;
    ///
    /// let config = CanopyConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.verbose_on_failure = true;
        config
    }

    /// Create a CI configuration preset.
    ///
    /// JSON logs at info level and a shorter request timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_config::{CanopyConfig, LogFormat};
    ///
    /// let config = CanopyConfig::ci();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();
        config.client.timeout_ms = 10000;
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`CanopyConfig`].
#[derive(Debug, Default)]
pub struct CanopyConfigBuilder {
    client: Option<ClientConfig>,
    logging: Option<LoggingConfig>,
}

impl CanopyConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client configuration.
    #[must_use]
    pub fn client(mut self, client: ClientConfig) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> CanopyConfig {
        CanopyConfig {
            client: self.client.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }
}
