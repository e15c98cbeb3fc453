//! API client for integration tests.

use crate::error::TestError;
use crate::reporter::Reporter;
use crate::request::{headers_string, parse_header, RequestConfig, TestRequest};
use crate::response::TestResponse;
use crate::transport::{ReqwestTransport, Transport};
use bytes::Bytes;
use canopy_config::{CanopyConfig, ConfigLoader};
use http::Method;
use std::sync::Arc;
use std::time::Instant;

/// Config file picked up by [`ApiTesting::from_env`] when present.
pub const DEFAULT_CONFIG_FILE: &str = "canopy.toml";

/// Environment prefix read by [`ApiTesting::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "CANOPY";

/// Client that sends requests against one base URL and reports failures.
///
/// Each verb helper logs the request line (`METHOD URL {headers}`) to the
/// reporter before sending. A request that cannot be built or sent is fatal.
///
/// # Example
///
/// ```ignore
/// use canopy_test::{ApiTesting, FailFast, RequestConfig};
/// use serde_json::json;
///
/// #[tokio::test]
/// async fn test_list_kids() {
///     let api = ApiTesting::new("http://localhost:8080", reqwest::Client::new());
///     let response = api.get(&FailFast, &RequestConfig::new().path("/family")).await;
///
///     response.expect_status(&FailFast, 200u16);
///     response.expect_json_path(&FailFast, ".kids.1.name", &json!("lisa"));
/// }
/// ```
#[derive(Clone)]
pub struct ApiTesting {
    base_url: String,
    transport: Arc<dyn Transport>,
    default_headers: Vec<(String, String)>,
    verbose_on_failure: bool,
}

impl ApiTesting {
    /// Creates a client that sends through `client`.
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new(client))
    }

    /// Creates a client over any transport.
    pub fn with_transport(base_url: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: base_url.into(),
            transport: Arc::new(transport),
            default_headers: Vec::new(),
            verbose_on_failure: false,
        }
    }

    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &CanopyConfig) -> Result<Self, TestError> {
        let transport = ReqwestTransport::from_config(&config.client)?;
        let mut api = Self::with_transport(config.client.base_url.clone(), transport)
            .with_verbose_on_failure(config.logging.verbose_on_failure);
        for (name, value) in &config.client.default_headers {
            api = api.with_default_header(name.clone(), value.clone());
        }
        Ok(api)
    }

    /// Loads configuration from `.env`, an optional `canopy.toml` and
    /// `CANOPY__*` variables, then builds a client from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unreadable or invalid.
    pub fn from_env() -> Result<Self, TestError> {
        let config = ConfigLoader::new()
            .with_defaults()
            .with_dotenv()?
            .with_optional_file(DEFAULT_CONFIG_FILE)?
            .with_env_prefix(DEFAULT_ENV_PREFIX)
            .load()?;
        Self::from_config(&config)
    }

    /// Adds a header sent with every request that does not set it itself.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers
            .retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    /// Appends the full response dump to expectation failures.
    #[must_use]
    pub fn with_verbose_on_failure(mut self, verbose: bool) -> Self {
        self.verbose_on_failure = verbose;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET request. Any body on `config` is left out.
    pub async fn get(&self, reporter: &dyn Reporter, config: &RequestConfig) -> TestResponse {
        self.dispatch(reporter, Method::GET, config, false).await
    }

    /// Sends a POST request.
    pub async fn post(&self, reporter: &dyn Reporter, config: &RequestConfig) -> TestResponse {
        self.request(reporter, Method::POST, config).await
    }

    /// Sends a PUT request.
    pub async fn put(&self, reporter: &dyn Reporter, config: &RequestConfig) -> TestResponse {
        self.request(reporter, Method::PUT, config).await
    }

    /// Sends a DELETE request. Any body on `config` is left out.
    pub async fn delete(&self, reporter: &dyn Reporter, config: &RequestConfig) -> TestResponse {
        self.dispatch(reporter, Method::DELETE, config, false).await
    }

    /// Sends a PATCH request.
    pub async fn patch(&self, reporter: &dyn Reporter, config: &RequestConfig) -> TestResponse {
        self.request(reporter, Method::PATCH, config).await
    }

    /// Sends a request with any method, logging it to `reporter`.
    ///
    /// The configured body is sent whatever the method.
    /// Build and transport errors go to [`Reporter::fatal`].
    pub async fn request(
        &self,
        reporter: &dyn Reporter,
        method: Method,
        config: &RequestConfig,
    ) -> TestResponse {
        self.dispatch(reporter, method, config, true).await
    }

    async fn dispatch(
        &self,
        reporter: &dyn Reporter,
        method: Method,
        config: &RequestConfig,
        with_body: bool,
    ) -> TestResponse {
        let mut request = match self.prepare(method.clone(), config) {
            Ok(request) => request,
            Err(e) => reporter.fatal(&format!("{method} {}: {e}", config.url(&self.base_url))),
        };
        if !with_body {
            request.body = Bytes::new();
        }

        let summary = request.summary();
        tracing::info!(
            http.method = %request.method,
            http.url = %request.uri,
            http.headers = %headers_string(&request.headers),
            "Sending request"
        );
        reporter.log(&summary);

        let start = Instant::now();
        match self.transport.send(request).await {
            Ok(response) => {
                tracing::info!(
                    http.status_code = response.status_code(),
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Received response"
                );
                response
                    .with_request(summary)
                    .with_verbose_on_failure(self.verbose_on_failure)
            }
            Err(e) => reporter.fatal(&format!("{summary}: {e}")),
        }
    }

    /// Sends a request without logging or reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or sent.
    pub async fn execute(&self, method: Method, config: &RequestConfig) -> Result<TestResponse, TestError> {
        let request = self.prepare(method, config)?;
        let summary = request.summary();
        let response = self.transport.send(request).await?;
        Ok(response
            .with_request(summary)
            .with_verbose_on_failure(self.verbose_on_failure))
    }

    fn prepare(&self, method: Method, config: &RequestConfig) -> Result<TestRequest, TestError> {
        let mut request = config.build(method, &self.base_url)?;
        for (name, value) in &self.default_headers {
            let (name, value) = parse_header(name, value)?;
            if !request.headers.contains_key(&name) {
                request.headers.insert(name, value);
            }
        }
        Ok(request)
    }
}

impl std::fmt::Debug for ApiTesting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTesting")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("verbose_on_failure", &self.verbose_on_failure)
            .finish_non_exhaustive()
    }
}
