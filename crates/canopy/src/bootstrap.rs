//! One-call setup for test binaries.

use canopy_config::{CanopyConfig, ConfigError, ConfigLoader};
use canopy_telemetry::{LogConfig, TelemetryError};
use canopy_test::{
    ApiTesting, FailFast, Reporter, TestError, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX,
};
use thiserror::Error;

/// Errors from [`setup`] and [`setup_with`].
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration could not be loaded or failed validation
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// The log filter was rejected
    #[error("logging: {0}")]
    Telemetry(#[from] TelemetryError),

    /// The HTTP client could not be built
    #[error("client: {0}")]
    Client(#[from] TestError),
}

/// Loads configuration from the environment, installs logging and returns a client.
///
/// Reads `.env`, an optional `canopy.toml` in the working directory and
/// `CANOPY__*` variables, in that order of precedence (later wins).
///
/// # Errors
///
/// Returns an error if configuration is invalid or the client cannot be built.
pub fn setup() -> Result<ApiTesting, SetupError> {
    let config = ConfigLoader::new()
        .with_defaults()
        .with_dotenv()?
        .with_optional_file(DEFAULT_CONFIG_FILE)?
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()?;
    setup_with(&config)
}

/// Installs logging for `config` and returns a client for its target.
///
/// Logs go through the test writer so `cargo test` captures them per test.
/// A subscriber installed by an earlier test in the same binary is kept.
///
/// # Errors
///
/// Returns an error if the log level is not a valid filter or the client
/// cannot be built.
pub fn setup_with(config: &CanopyConfig) -> Result<ApiTesting, SetupError> {
    let log_config = LogConfig {
        test_writer: true,
        ..LogConfig::from(&config.logging)
    };
    match canopy_telemetry::init_logging(&log_config) {
        Ok(()) | Err(TelemetryError::LoggingInit(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let api = ApiTesting::from_config(config)?;
    FailFast.log(&format!("Testing against {}", api.base_url()));
    Ok(api)
}
