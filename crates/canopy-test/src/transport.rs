//! Transports that carry a [`TestRequest`] to a server and back.

use crate::error::TestError;
use crate::request::TestRequest;
use crate::response::TestResponse;
use bytes::Bytes;
use canopy_config::ClientConfig;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Boxed future returned by transports and handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends a built request and returns the buffered response.
///
/// The transport owns the connection policy (timeouts, pooling, TLS); the
/// API client only decides what to send.
pub trait Transport: Send + Sync {
    /// Sends `request`.
    fn send(&self, request: TestRequest) -> BoxFuture<'_, Result<TestResponse, TestError>>;
}

/// Transport backed by a caller-supplied [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with the configured timeout and user agent.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Returns the wrapped client.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TestRequest) -> BoxFuture<'_, Result<TestResponse, TestError>> {
        Box::pin(async move {
            let response = self
                .client
                .request(request.method, request.uri.to_string())
                .headers(request.headers)
                .body(request.body)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;

            Ok(TestResponse::new(status, headers, body))
        })
    }
}

/// Handler function type for [`HandlerTransport`].
pub type TestHandler =
    Arc<dyn Fn(TestRequest) -> BoxFuture<'static, http::Response<Full<Bytes>>> + Send + Sync>;

/// Transport that answers requests with an in-process handler.
///
/// No socket is opened, which makes it suitable for unit tests of code that
/// drives an [`ApiTesting`](crate::ApiTesting) client.
///
/// # Example
///
/// ```ignore
/// use canopy_test::{ApiTesting, HandlerTransport};
///
/// let transport = HandlerTransport::new(|req| async move {
///     http::Response::new(Full::new(Bytes::from(req.uri.path().to_string())))
/// });
/// let api = ApiTesting::with_transport("http://test.local", transport);
/// ```
#[derive(Clone)]
pub struct HandlerTransport {
    handler: TestHandler,
}

impl HandlerTransport {
    /// Creates a transport from a handler function.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(TestRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = http::Response<Full<Bytes>>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |req| -> BoxFuture<'static, http::Response<Full<Bytes>>> {
                Box::pin(handler(req))
            }),
        }
    }

    /// Creates a transport that echoes the request back as JSON.
    ///
    /// The body has `method`, `path`, `query`, `headers` and `body` fields.
    pub fn echo() -> Self {
        Self::new(|req| async move {
            let headers: serde_json::Map<String, serde_json::Value> = req
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        serde_json::Value::from(value.to_str().unwrap_or_default()),
                    )
                })
                .collect();

            let echoed = serde_json::json!({
                "method": req.method.as_str(),
                "path": req.uri.path(),
                "query": req.uri.query(),
                "headers": headers,
                "body": String::from_utf8_lossy(&req.body),
            });

            json_response(StatusCode::OK, &echoed)
        })
    }

    /// Creates a transport that always returns a fixed response.
    pub fn fixed_response(status: StatusCode, body: impl Into<String>) -> Self {
        let body = Bytes::from(body.into());
        Self::new(move |_req| {
            let body = body.clone();
            async move {
                let mut response = http::Response::new(Full::new(body));
                *response.status_mut() = status;
                response
            }
        })
    }

    /// Creates a transport that always returns the given JSON document.
    pub fn fixed_json(status: StatusCode, document: serde_json::Value) -> Self {
        Self::new(move |_req| {
            let document = document.clone();
            async move { json_response(status, &document) }
        })
    }
}

impl std::fmt::Debug for HandlerTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}

impl Transport for HandlerTransport {
    fn send(&self, request: TestRequest) -> BoxFuture<'_, Result<TestResponse, TestError>> {
        let response = (self.handler)(request);
        Box::pin(async move { TestResponse::from_http(response.await).await })
    }
}

/// Builds a JSON response with the given status.
pub fn json_response(status: StatusCode, document: &serde_json::Value) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(Bytes::from(document.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
