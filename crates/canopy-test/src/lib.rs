//! # Canopy Test
//!
//! Helpers for writing integration tests against a running REST API.
//!
//! ## Key Features
//!
//! - **Request Config**: Fluent, reusable description of path, query, headers and body
//! - **Verb Helpers**: `get`/`post`/`put`/`delete`/`patch` that log the request line
//! - **Pluggable Transport**: `reqwest` for real servers, in-process handlers for unit tests
//! - **JSON Path Expectations**: Check `.kids.1.name` style paths in response bodies
//! - **Reporters**: Fail fast on the first error, or collect every failure and fail once
//!
//! ## Example
//!
//! ```ignore
//! use canopy_test::{ApiTesting, RequestConfig, SoftReporter};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_user() {
//!     let api = ApiTesting::from_env().unwrap();
//!     let reporter = SoftReporter::new();
//!
//!     let response = api
//!         .post(&reporter, &RequestConfig::new().path("/users").json(&json!({"name": "Alice"})))
//!         .await;
//!
//!     response.expect_status(&reporter, 201u16);
//!     response.expect_json_path(&reporter, ".name", &json!("Alice"));
//!     response.expect_json_present(&reporter, ".id");
//!
//!     reporter.assert_clean();
//! }
//! ```
//!
//! ## Choosing a Reporter
//!
//! | Reporter       | `error`            | `fatal`                    |
//! |----------------|--------------------|----------------------------|
//! | `FailFast`     | panics             | panics                     |
//! | `SoftReporter` | recorded, continue | panics with all recorded   |

#![doc(html_root_url = "https://docs.rs/canopy-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod reporter;
mod request;
mod response;
mod transport;

pub use client::{ApiTesting, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX};
pub use error::TestError;
pub use reporter::{FailFast, Reporter, SoftReporter};
pub use request::{RequestConfig, TestRequest};
pub use response::TestResponse;
pub use transport::{
    json_response, BoxFuture, HandlerTransport, ReqwestTransport, TestHandler, Transport,
};

/// Re-exported so callers can name methods and status codes without a direct dependency.
pub use http::{Method, StatusCode};
