//! # Canopy
//!
//! **Integration-test helpers for REST APIs**
//!
//! Canopy sends requests to a running service and checks what comes back:
//!
//! - **Dot-path JSON lookups** – `.kids.1.name` reaches into objects and arrays
//! - **Request configs** – path templates, query strings, auth headers and bodies
//! - **Reporters** – fail on the first broken expectation or collect them all
//! - **Layered configuration** – defaults, `canopy.toml`, `.env` and `CANOPY__*`
//! - **Structured logs** – every request line goes through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use canopy::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_family() {
//!     let api = canopy::setup().unwrap();
//!     let reporter = SoftReporter::new();
//!
//!     let response = api.get(&reporter, &RequestConfig::new().path("/family")).await;
//!
//!     response.expect_status(&reporter, 200u16);
//!     response.expect_json_path(&reporter, ".kids.1.name", &json!("lisa"));
//!     response.expect_json_present(&reporter, ".pet");
//!
//!     reporter.assert_clean();
//! }
//! ```
//!
//! ## Path Lookups Without HTTP
//!
//! ```
//! use canopy::path::find;
//! use serde_json::json;
//!
//! let doc = json!({"nested": {"sub": "super"}});
//! assert_eq!(find(&doc, ".nested.sub"), Some(&json!("super")));
//! ```

#![doc(html_root_url = "https://docs.rs/canopy/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bootstrap;

// Re-export path lookup types
pub use canopy_path as path;

// Re-export configuration types
pub use canopy_config as config;

// Re-export logging setup
pub use canopy_telemetry as telemetry;

// Re-export request and assertion types
pub use canopy_test as testing;

pub use bootstrap::{setup, setup_with, SetupError};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use canopy::prelude::*;
/// ```
pub mod prelude {
    pub use canopy_path::{find, lookup, JsonPath, Lookup, PathError};

    pub use canopy_config::{CanopyConfig, ConfigLoader};

    pub use canopy_test::{
        ApiTesting, FailFast, HandlerTransport, Method, Reporter, RequestConfig,
        ReqwestTransport, SoftReporter, StatusCode, TestError, TestResponse, Transport,
    };

    pub use crate::{setup, setup_with, SetupError};
}
