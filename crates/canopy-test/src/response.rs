//! Test response wrapper.

use crate::error::TestError;
use crate::reporter::{FailFast, Reporter};
use bytes::Bytes;
use canopy_path::{JsonPath, Lookup};
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// A buffered response with helpers for expectations and assertions.
///
/// Two families of checks are available:
///
/// - `expect_*` methods report failures to a [`Reporter`] and return
///   whether the check passed
/// - `assert_*` methods panic on failure, for plain `#[test]` functions
pub struct TestResponse {
    /// HTTP status code
    status: StatusCode,
    /// Response headers
    headers: HeaderMap,
    /// Response body bytes
    body: Bytes,
    /// Request line of the request that produced this response
    request: Option<String>,
    /// Append the full dump to failure messages
    verbose_on_failure: bool,
}

impl TestResponse {
    /// Buffers the body of an `http::Response`.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: http_body_util::BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let collected = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?;

        Ok(Self::new(parts.status, parts.headers, collected.to_bytes()))
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            request: None,
            verbose_on_failure: false,
        }
    }

    /// Records the request line shown in failure messages.
    #[must_use]
    pub fn with_request(mut self, summary: impl Into<String>) -> Self {
        self.request = Some(summary.into());
        self
    }

    /// Appends the full response dump to failure messages.
    #[must_use]
    pub fn with_verbose_on_failure(mut self, verbose: bool) -> Self {
        self.verbose_on_failure = verbose;
        self
    }

    /// Returns the request line, if known.
    #[must_use]
    pub fn request(&self) -> Option<&str> {
        self.request.as_deref()
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the status is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Returns true if the status is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the first value of header `name`.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Returns header `name` if it is visible ASCII.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the Content-Length header value.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.header_str(header::CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as UTF-8 text.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Decodes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Decodes the body into an untyped document.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    /// Decodes the body once and passes the document to `f`.
    ///
    /// Use this to run several borrowed lookups without cloning values out.
    pub fn with_json<R>(&self, f: impl FnOnce(&Value) -> R) -> Result<R, TestError> {
        let document = self.json_value()?;
        Ok(f(&document))
    }

    /// Returns a copy of the value at `path` in the JSON body.
    ///
    /// `Ok(None)` means the path did not resolve; a present `null` is
    /// returned as `Ok(Some(Value::Null))`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let name = response.json_path(".kids.1.name")?;
    /// assert_eq!(name, Some(json!("lisa")));
    /// ```
    pub fn json_path(&self, path: &str) -> Result<Option<Value>, TestError> {
        let path = JsonPath::parse(path)?;
        self.with_json(|document| path.resolve(document).cloned())
    }

    /// Renders the status line, headers and body for logs.
    ///
    /// JSON bodies are pretty-printed.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if let Some(request) = &self.request {
            out.push_str(request);
            out.push('\n');
        }
        out.push_str(&self.status.to_string());
        for (name, value) in &self.headers {
            out.push('\n');
            out.push_str(name.as_str());
            out.push_str(": ");
            out.push_str(value.to_str().unwrap_or("<binary>"));
        }
        out.push_str("\n\n");

        match serde_json::from_slice::<Value>(&self.body) {
            Ok(document) => out.push_str(
                &serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string()),
            ),
            Err(_) => out.push_str(&String::from_utf8_lossy(&self.body)),
        }
        out
    }

    /// Sends the dump to `reporter` as a log line.
    pub fn dump_to(&self, reporter: &dyn Reporter) {
        tracing::debug!(http.status_code = self.status.as_u16(), "Response dumped");
        reporter.log(&self.dump());
    }

    // Expectations

    /// Expects the status code to equal `expected`.
    pub fn expect_status(&self, reporter: &dyn Reporter, expected: impl Into<u16>) -> bool {
        let expected = expected.into();
        if self.status.as_u16() == expected {
            return true;
        }
        self.fail(
            reporter,
            &format!("expected status {expected}, got {}", self.status),
        );
        false
    }

    /// Expects a header to be present with exactly `expected` as its value.
    pub fn expect_header(
        &self,
        reporter: &dyn Reporter,
        name: impl AsRef<str>,
        expected: impl AsRef<str>,
    ) -> bool {
        let name = name.as_ref();
        let expected = expected.as_ref();
        match self.header_str(name) {
            Some(actual) if actual == expected => true,
            Some(actual) => {
                self.fail(
                    reporter,
                    &format!("header '{name}': expected '{expected}', got '{actual}'"),
                );
                false
            }
            None => {
                self.fail(
                    reporter,
                    &format!("header '{name}': expected '{expected}', but it is missing"),
                );
                false
            }
        }
    }

    /// Expects the value at `path` in the JSON body to equal `expected`.
    ///
    /// A body that is not JSON, or a malformed path, is fatal.
    pub fn expect_json_path(&self, reporter: &dyn Reporter, path: &str, expected: &Value) -> bool {
        let path = self.parse_path(reporter, path);
        let document = self.decode(reporter);

        match path.lookup(&document).value() {
            Some(actual) if actual == expected => true,
            Some(actual) => {
                self.fail(
                    reporter,
                    &format!("JSON path '{path}': expected {expected}, got {actual}"),
                );
                false
            }
            None => {
                self.fail(
                    reporter,
                    &format!("JSON path '{path}' not found in: {document}"),
                );
                false
            }
        }
    }

    /// Expects `path` to resolve in the JSON body; a present `null` counts.
    pub fn expect_json_present(&self, reporter: &dyn Reporter, path: &str) -> bool {
        let path = self.parse_path(reporter, path);
        let document = self.decode(reporter);

        if path.lookup(&document).is_found() {
            return true;
        }
        self.fail(
            reporter,
            &format!("JSON path '{path}' not found in: {document}"),
        );
        false
    }

    /// Expects `path` not to resolve in the JSON body.
    pub fn expect_json_absent(&self, reporter: &dyn Reporter, path: &str) -> bool {
        let path = self.parse_path(reporter, path);
        let document = self.decode(reporter);

        match path.lookup(&document) {
            Lookup::NotFound => true,
            found => {
                let actual = found.value().cloned().unwrap_or_default();
                self.fail(
                    reporter,
                    &format!("JSON path '{path}': expected no value, got {actual}"),
                );
                false
            }
        }
    }

    /// Expects the JSON body to be an object and hands it to `check`.
    pub fn expect_json_object(
        &self,
        reporter: &dyn Reporter,
        check: impl FnOnce(&Map<String, Value>),
    ) -> bool {
        match self.decode(reporter) {
            Value::Object(map) => {
                check(&map);
                true
            }
            other => {
                self.fail(
                    reporter,
                    &format!("expected a JSON object, got: {other}"),
                );
                false
            }
        }
    }

    /// Expects the JSON body to be an array and hands it to `check`.
    pub fn expect_json_array(&self, reporter: &dyn Reporter, check: impl FnOnce(&[Value])) -> bool {
        match self.decode(reporter) {
            Value::Array(items) => {
                check(&items);
                true
            }
            other => {
                self.fail(
                    reporter,
                    &format!("expected a JSON array, got: {other}"),
                );
                false
            }
        }
    }

    /// Hands the body as text to `check`. A non-UTF-8 body is fatal.
    pub fn expect_text(&self, reporter: &dyn Reporter, check: impl FnOnce(&str)) -> bool {
        match std::str::from_utf8(&self.body) {
            Ok(text) => {
                check(text);
                true
            }
            Err(e) => reporter.fatal(&self.message(&format!("response body is not UTF-8: {e}"))),
        }
    }

    fn decode(&self, reporter: &dyn Reporter) -> Value {
        match serde_json::from_slice(&self.body) {
            Ok(document) => document,
            Err(e) => reporter.fatal(&self.message(&format!("response body is not JSON: {e}"))),
        }
    }

    fn parse_path(&self, reporter: &dyn Reporter, path: &str) -> JsonPath {
        match JsonPath::parse(path) {
            Ok(path) => path,
            Err(e) => reporter.fatal(&self.message(&e.to_string())),
        }
    }

    fn message(&self, problem: &str) -> String {
        let mut message = match &self.request {
            Some(request) => format!("{request}: {problem}"),
            None => problem.to_string(),
        };
        if self.verbose_on_failure {
            message.push_str("\n--- response ---\n");
            message.push_str(&self.dump());
        }
        message
    }

    fn fail(&self, reporter: &dyn Reporter, problem: &str) {
        reporter.error(&self.message(problem));
    }

    // Panicking shorthands over `FailFast`, for plain `#[test]` bodies.

    /// Panics unless the status equals `expected`.
    pub fn assert_status(&self, expected: impl Into<u16>) -> &Self {
        self.expect_status(&FailFast, expected);
        self
    }

    /// Panics unless the status is 2xx.
    pub fn assert_success(&self) -> &Self {
        if !self.is_success() {
            FailFast.fatal(&self.message(&format!("expected a 2xx status, got {}", self.status)));
        }
        self
    }

    /// Panics unless header `name` equals `expected`.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        self.expect_header(&FailFast, name, expected);
        self
    }

    /// Panics unless Content-Type starts with `expected`, so parameters such
    /// as `; charset=utf-8` are ignored.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        match self.content_type() {
            Some(actual) if actual.starts_with(expected) => {}
            actual => FailFast.fatal(&self.message(&format!(
                "content-type: expected '{expected}', got {actual:?}"
            ))),
        }
        self
    }

    /// Panics unless the body is UTF-8 and contains `needle`.
    pub fn assert_body_contains(&self, needle: impl AsRef<str>) -> &Self {
        let needle = needle.as_ref();
        self.expect_text(&FailFast, |text| {
            if !text.contains(needle) {
                FailFast.fatal(&self.message(&format!("body does not contain '{needle}'")));
            }
        });
        self
    }

    /// Panics unless the whole JSON body equals `expected`.
    pub fn assert_json_eq(&self, expected: &Value) -> &Self {
        self.expect_json_path(&FailFast, ".", expected);
        self
    }

    /// Panics unless `path` resolves to `expected` in the JSON body.
    pub fn assert_json_field(&self, path: impl AsRef<str>, expected: &Value) -> &Self {
        self.expect_json_path(&FailFast, path.as_ref(), expected);
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::SoftReporter;
    use serde_json::json;

    fn create_response(status: u16, body: &str) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        TestResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::from(body.to_string()),
        )
    }

    fn family() -> TestResponse {
        create_response(
            200,
            r#"{"key":"value","nested":{"sub":"super"},"kids":[{"name":"dennis"},{"name":"lisa"}],"pet":null}"#,
        )
    }

    #[test]
    fn test_status() {
        let response = create_response(200, "{}");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.status_code(), 200);
        assert!(response.is_success());
    }

    #[test]
    fn test_client_and_server_error() {
        assert!(create_response(404, "{}").is_client_error());
        assert!(create_response(500, "{}").is_server_error());
    }

    #[test]
    fn test_header() {
        let response = create_response(200, "{}");
        assert_eq!(response.header_str("Content-Type"), Some("application/json"));
        assert_eq!(response.content_length(), None);
    }

    #[test]
    fn test_json() {
        let response = create_response(200, "{\"name\":\"Alice\",\"age\":30}");
        let value: Value = response.json().unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["age"], 30);
    }

    #[test]
    fn test_json_path() {
        let response = family();
        assert_eq!(response.json_path(".kids.1.name").unwrap(), Some(json!("lisa")));
        assert_eq!(response.json_path(".nested.sub").unwrap(), Some(json!("super")));
        assert_eq!(response.json_path(".pet").unwrap(), Some(Value::Null));
        assert_eq!(response.json_path(".kids.5").unwrap(), None);
        assert!(matches!(response.json_path("kids"), Err(TestError::Path(_))));
    }

    #[test]
    fn test_json_path_on_non_json_body() {
        let response = create_response(200, "plain");
        assert!(matches!(response.json_path(".a"), Err(TestError::Json(_))));
    }

    #[test]
    fn test_with_json() {
        let response = family();
        let names = response
            .with_json(|doc| {
                (0..2)
                    .filter_map(|i| canopy_path::find(doc, &format!(".kids.{i}.name")))
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(names, vec!["dennis", "lisa"]);
    }

    #[test]
    fn test_dump() {
        let response = create_response(201, "{\"id\":7}").with_request("POST http://x/items {}");
        let dump = response.dump();
        assert!(dump.starts_with("POST http://x/items {}\n201 Created\n"));
        assert!(dump.contains("content-type: application/json"));
        assert!(dump.ends_with("{\n  \"id\": 7\n}"));
    }

    #[test]
    fn test_dump_to_reporter() {
        let reporter = SoftReporter::new();
        create_response(200, "not json").dump_to(&reporter);
        assert!(reporter.logs()[0].ends_with("not json"));
    }

    #[test]
    fn test_expect_status() {
        let reporter = SoftReporter::new();
        let response = create_response(404, "{}").with_request("GET http://x/missing {}");

        assert!(!response.expect_status(&reporter, 200u16));
        assert!(response.expect_status(&reporter, StatusCode::NOT_FOUND));

        let errors = reporter.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            "GET http://x/missing {}: expected status 200, got 404 Not Found"
        );
    }

    #[test]
    fn test_expect_header() {
        let reporter = SoftReporter::new();
        let response = create_response(200, "{}");

        assert!(response.expect_header(&reporter, "content-type", "application/json"));
        assert!(!response.expect_header(&reporter, "content-type", "text/plain"));
        assert!(!response.expect_header(&reporter, "etag", "abc"));

        let errors = reporter.take_errors();
        assert!(errors[0].contains("got 'application/json'"));
        assert!(errors[1].contains("missing"));
    }

    #[test]
    fn test_expect_json_path() {
        let reporter = SoftReporter::new();
        let response = family();

        assert!(response.expect_json_path(&reporter, ".key", &json!("value")));
        assert!(response.expect_json_path(&reporter, ".kids.1.name", &json!("lisa")));
        assert!(response.expect_json_path(&reporter, ".pet", &Value::Null));
        assert!(!response.expect_json_path(&reporter, ".kids.0.name", &json!("lisa")));
        assert!(!response.expect_json_path(&reporter, ".missing", &Value::Null));

        let errors = reporter.take_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            "JSON path '.kids.0.name': expected \"lisa\", got \"dennis\""
        );
        assert!(errors[1].starts_with("JSON path '.missing' not found in: {"));
    }

    #[test]
    fn test_expect_json_present_and_absent() {
        let reporter = SoftReporter::new();
        let response = family();

        assert!(response.expect_json_present(&reporter, ".pet"));
        assert!(response.expect_json_absent(&reporter, ".owner"));
        assert!(!response.expect_json_present(&reporter, ".owner"));
        assert!(!response.expect_json_absent(&reporter, ".pet"));

        let errors = reporter.take_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].ends_with("expected no value, got null"));
    }

    #[test]
    fn test_verbose_on_failure_appends_dump() {
        let reporter = SoftReporter::new();
        let response = family().with_verbose_on_failure(true);

        assert!(!response.expect_status(&reporter, 500u16));
        let errors = reporter.take_errors();
        assert!(errors[0].contains("--- response ---"));
        assert!(errors[0].contains("\"dennis\""));
    }

    #[test]
    fn test_expect_json_object_and_array() {
        let reporter = SoftReporter::new();

        let object = family();
        assert!(object.expect_json_object(&reporter, |map| {
            assert!(map.contains_key("kids"));
        }));
        assert!(!object.expect_json_array(&reporter, |_| {}));

        let array = create_response(200, "[1,2,3]");
        let mut seen = 0;
        assert!(array.expect_json_array(&reporter, |items| seen = items.len()));
        assert_eq!(seen, 3);

        assert_eq!(reporter.take_errors().len(), 1);
    }

    #[test]
    fn test_expect_text() {
        let reporter = SoftReporter::new();
        let response = create_response(200, "hello");
        assert!(response.expect_text(&reporter, |text| assert_eq!(text, "hello")));
        reporter.assert_clean();
    }

    #[test]
    #[should_panic(expected = "response body is not JSON")]
    fn test_expect_json_on_non_json_is_fatal() {
        let reporter = SoftReporter::new();
        create_response(200, "<html>").expect_json_path(&reporter, ".a", &json!(1));
    }

    #[test]
    #[should_panic(expected = "must start with '.'")]
    fn test_expect_json_malformed_path_is_fatal() {
        let reporter = SoftReporter::new();
        family().expect_json_present(&reporter, "key");
    }

    #[test]
    fn test_assert_status() {
        let response = create_response(200, "{}");
        response
            .assert_status(StatusCode::OK)
            .assert_status(200u16)
            .assert_success();
    }

    #[test]
    fn test_assert_header() {
        let response = create_response(200, "{}");
        response
            .assert_header("Content-Type", "application/json")
            .assert_content_type("application/json");
    }

    #[test]
    fn test_assert_body_contains() {
        create_response(200, "{\"name\":\"Alice\"}").assert_body_contains("Alice");
    }

    #[test]
    fn test_assert_json_eq() {
        let response = create_response(200, "{\"name\":\"Alice\"}");
        response.assert_json_eq(&json!({"name": "Alice"}));
    }

    #[test]
    fn test_assert_json_field() {
        let response = family();
        response
            .assert_json_field(".nested.sub", &json!("super"))
            .assert_json_field(".kids.1.name", &json!("lisa"))
            .assert_json_field(".pet", &Value::Null);
    }

    #[test]
    #[should_panic(expected = "GET http://x/ {}: expected a 2xx status, got 503")]
    fn test_assert_success_names_request() {
        create_response(503, "{}")
            .with_request("GET http://x/ {}")
            .assert_success();
    }

    #[test]
    #[should_panic(expected = "content-type: expected 'text/html'")]
    fn test_assert_content_type_mismatch() {
        create_response(200, "{}").assert_content_type("text/html");
    }

    #[test]
    #[should_panic(expected = "JSON path '.kids.5' not found")]
    fn test_assert_json_field_missing() {
        family().assert_json_field(".kids.5", &json!(1));
    }
}
