//! Layered loading: preset or file, then `.env`, then prefixed variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{CanopyConfig, ConfigError, LogFormat};

/// Builds a [`CanopyConfig`] from a base layer plus variable overrides.
///
/// The base is the defaults, a preset, a file or an inline string; the last
/// one set wins. Prefixed variables are applied on top by [`load`](Self::load).
///
/// # Example
///
/// ```no_run
/// use canopy_config::ConfigLoader;
///
/// # fn main() -> Result<(), canopy_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("canopy.toml")?
///     .with_env_prefix("CANOPY")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: CanopyConfig,
    env_prefix: Option<String>,
    vars: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Starts from built-in defaults with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CanopyConfig::default(),
            env_prefix: None,
            vars: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = CanopyConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = CanopyConfig::development();
        self
    }

    /// Start with the CI preset.
    #[must_use]
    pub fn with_ci(mut self) -> Self {
        self.config = CanopyConfig::ci();
        self
    }

    /// Replaces the current layer with a TOML or JSON file, chosen by extension.
    ///
    /// Fields the file leaves out take their schema defaults, not the values
    /// of an earlier preset.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, not TOML/JSON, or has
    /// fields the schema does not know.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the current layer with inline `content` in `format`
    /// (`"toml"` or `"json"`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Fails on an unknown format or content that does not parse.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [client]
    ///     base_url = "http://127.0.0.1:3000"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.client.base_url, "http://127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Enables `PREFIX__SECTION__KEY` overrides, applied by [`load`](Self::load).
    /// For example, with prefix "CANOPY":
    /// - `CANOPY__CLIENT__BASE_URL=http://localhost:9000`
    /// - `CANOPY__CLIENT__DEFAULT_HEADERS__X_API_KEY=secret` (sent as `x-api-key`)
    /// - `CANOPY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Read overrides from the given variables instead of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Load a `.env` file from the current directory or its parents.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies overrides, validates, and returns the configuration.
    ///
    /// # Errors
    ///
    /// Fails on an override of the wrong type or a config that does not validate.
    pub fn load(mut self) -> Result<CanopyConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> CanopyConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let vars: Vec<(String, String)> = match self.vars.take() {
            Some(vars) => vars.into_iter().collect(),
            None => env::vars().collect(),
        };

        let mut matching: Vec<_> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        matching.sort();

        for (key, value) in matching {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(key_without_prefix) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__"))
        else {
            // Shares the prefix but not the separator, e.g. CANOPYX.
            return Ok(());
        };

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["CLIENT", "BASE_URL"] => {
                self.config.client.base_url = value.to_string();
            }
            ["CLIENT", "TIMEOUT_MS"] => {
                self.config.client.timeout_ms = value
                    .parse()
                    .map_err(|_| ConfigError::env_var(key, "expected integer"))?;
            }
            ["CLIENT", "USER_AGENT"] => {
                self.config.client.user_agent = value.to_string();
            }
            ["CLIENT", "DEFAULT_HEADERS", name] if !name.is_empty() => {
                let header = name.to_lowercase().replace('_', "-");
                self.config
                    .client
                    .default_headers
                    .insert(header, value.to_string());
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_var(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    "compact" => LogFormat::Compact,
                    _ => {
                        return Err(ConfigError::env_var(
                            key,
                            "expected 'json', 'pretty', or 'compact'",
                        ))
                    }
                };
            }
            ["LOGGING", "VERBOSE_ON_FAILURE"] => {
                self.config.logging.verbose_on_failure = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_var(key, "expected boolean"))?;
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Deserializes config text in the named format (`toml` or `json`).
fn parse(content: &str, format: &str) -> Result<CanopyConfig, ConfigError> {
    match format.to_ascii_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
