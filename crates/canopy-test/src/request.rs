//! Request configuration and building.

use crate::error::TestError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use serde::Serialize;
use std::fmt::Write;

/// Describes one request: path, query, headers and body.
///
/// The same config can be sent several times and with different methods.
///
/// # Example
///
/// ```
/// use canopy_test::RequestConfig;
///
/// let config = RequestConfig::new()
///     .path_template("/users/{id}/orders", ["42"])
///     .query("status", "open")
///     .header("Accept", "application/json");
///
/// assert_eq!(config.path_and_query(), "/users/42/orders?status=open");
/// ```
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
    // Deferred so the builder chain stays infallible; surfaced by `build`.
    error: Option<String>,
}

impl RequestConfig {
    /// Creates an empty config addressing the base URL itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request path, appended verbatim to the base URL.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the path from a template, filling `{name}` placeholders in order.
    ///
    /// Each value is percent-encoded. A count mismatch between placeholders
    /// and values is reported when the request is built.
    pub fn path_template<I, V>(mut self, template: &str, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let params: Vec<String> = params.into_iter().map(|p| p.to_string()).collect();
        match expand_template(template, &params) {
            Ok(path) => self.path = path,
            Err(e) => {
                self.path = template.to_string();
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Appends a query parameter. Repeated names are kept in order.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Sets a header, replacing an earlier value with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Accept header.
    pub fn accept(self, accept: impl Into<String>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the Authorization header for HTTP Basic authentication.
    pub fn basic_auth(self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", username.as_ref(), password.as_ref()));
        self.header(header::AUTHORIZATION.as_str(), format!("Basic {credentials}"))
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body and its Content-Type in one call.
    pub fn content(self, body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body(body).content_type(content_type)
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    ///
    /// # Example
    ///
    /// ```
    /// use canopy_test::RequestConfig;
    /// use serde_json::json;
    ///
    /// let config = RequestConfig::new()
    ///     .path("/users")
    ///     .json(&json!({"name": "Alice"}));
    /// ```
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => {
                self.error.get_or_insert(format!("JSON body: {e}"));
            }
        }
        self.content_type("application/json")
    }

    /// Sets the request body as form-urlencoded.
    ///
    /// This also sets the `Content-Type` header to `application/x-www-form-urlencoded`.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match encode_form(value) {
            Ok(encoded) => self.body = Some(Bytes::from(encoded)),
            Err(e) => {
                self.error.get_or_insert(format!("form body: {e}"));
            }
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Returns the path followed by the percent-encoded query string.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let mut out = self.path.clone();
        let mut separator = if out.ends_with('?') {
            ""
        } else if out.contains('?') {
            "&"
        } else {
            "?"
        };
        for (name, value) in &self.query {
            let _ = write!(
                out,
                "{separator}{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            );
            separator = "&";
        }
        out
    }

    /// Joins `base_url` with the path and query.
    ///
    /// A trailing `/` on the base is dropped when the path starts with one.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        let path_and_query = self.path_and_query();
        if path_and_query.starts_with('/') {
            format!("{}{path_and_query}", base_url.trim_end_matches('/'))
        } else {
            format!("{base_url}{path_and_query}")
        }
    }

    /// Builds a request against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `TestError::RequestBuild` for an invalid URL or a deferred
    /// builder error, and `TestError::InvalidHeader` for a bad header.
    pub fn build(&self, method: Method, base_url: &str) -> Result<TestRequest, TestError> {
        if let Some(error) = &self.error {
            return Err(TestError::RequestBuild(error.clone()));
        }

        let url = self.url(base_url);
        let uri: Uri = url
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URL {url}: {e}")))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        Ok(TestRequest {
            method,
            uri,
            headers,
            body: self.body.clone().unwrap_or_default(),
        })
    }
}

/// A fully built request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
}

impl TestRequest {
    /// Converts this request to an HTTP request.
    pub fn into_http_request(self) -> http::Request<Full<Bytes>> {
        let mut request = http::Request::new(Full::new(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }

    /// Renders `METHOD URL headers` for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {} {}", self.method, self.uri, headers_string(&self.headers))
    }
}

/// Renders headers as `{name: value, ...}`.
pub(crate) fn headers_string(headers: &HeaderMap) -> String {
    let rendered: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{name}: {}", value.to_str().unwrap_or("<binary>")))
        .collect();
    format!("{{{}}}", rendered.join(", "))
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TestError> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    let header_value = HeaderValue::try_from(value)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    Ok((header_name, header_value))
}

fn expand_template(template: &str, params: &[String]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut params = params.iter();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            return Err(format!("unclosed placeholder in path template '{template}'"));
        };
        let placeholder = &rest[start..=start + len];
        let param = params
            .next()
            .ok_or_else(|| format!("no value for {placeholder} in path template '{template}'"))?;

        out.push_str(&rest[..start]);
        out.push_str(&urlencoding::encode(param));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    if params.next().is_some() {
        return Err(format!("too many values for path template '{template}'"));
    }
    Ok(out)
}

fn encode_form<T: Serialize>(value: &T) -> Result<String, TestError> {
    let serde_json::Value::Object(map) = serde_json::to_value(value)? else {
        return Err(TestError::RequestBuild(
            "expected an object for form encoding".to_string(),
        ));
    };

    let pairs: Vec<String> = map
        .into_iter()
        .map(|(k, v)| {
            let v_str = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(&k), urlencoding::encode(&v_str))
        })
        .collect();
    Ok(pairs.join("&"))
}
