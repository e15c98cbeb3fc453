//! Typed configuration for Canopy API tests.
//!
//! Test suites usually need to point the same tests at different
//! deployments. This crate loads the target and logging settings with:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use canopy_config::ConfigLoader;
//!
//! # fn main() -> Result<(), canopy_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_dotenv()?
//!     .with_optional_file("canopy.toml")?
//!     .with_env_prefix("CANOPY")
//!     .load()?;
//!
//! println!("Testing against: {}", config.client.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [client]
//! base_url = "http://localhost:8080"
//! timeout_ms = 30000
//! user_agent = "canopy/0.1.0"
//!
//! [client.default_headers]
//! accept = "application/json"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "pretty"
//! verbose_on_failure = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `CANOPY__CLIENT__BASE_URL=https://staging.example.com`
//! - `CANOPY__CLIENT__DEFAULT_HEADERS__AUTHORIZATION="Bearer abc"`
//! - `CANOPY__LOGGING__FORMAT=json`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
