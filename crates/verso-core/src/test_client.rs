//! TestClient for integration testing without network binding
//!
//! Sends simulated HTTP requests through the full match/dispatch pipeline
//! without starting a real server.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = AppBuilder::new(registry, policy).build()?;
//! let client = TestClient::new(app);
//!
//! let response = client.get("/api/orders").await;
//! response.assert_status(200);
//! ```

use crate::app::App;
use crate::request::Request;
use crate::response::Response;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Test client wrapping a built [`App`].
pub struct TestClient {
    app: Arc<App>,
}

impl TestClient {
    /// Create a new test client.
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(TestRequest::get(path)).await
    }

    /// Send a request with full control.
    pub async fn request(&self, req: TestRequest) -> TestResponse {
        let uri: http::Uri = req
            .path
            .parse()
            .unwrap_or_else(|_| "/".parse().expect("root uri"));
        let mut builder = http::Request::builder().method(req.method).uri(uri);
        for (key, value) in req.headers.iter() {
            builder = builder.header(key, value);
        }
        let (parts, _) = builder.body(()).expect("test request").into_parts();

        let request = Request::new(
            parts,
            Bytes::new(),
            self.app.state_ref(),
            HashMap::new(),
        );

        let response = self.app.handle(request).await;
        TestResponse::from_response(response).await
    }
}

/// Builder for a simulated request.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
}

impl TestRequest {
    /// Start a GET request for `path` (query string included).
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("valid header name");
        let value: HeaderValue = value.parse().expect("valid header value");
        self.headers.append(name, value);
        self
    }

    /// Set the `Accept` header.
    pub fn accept(self, value: &str) -> Self {
        self.header("accept", value)
    }
}

/// A captured response with assertion helpers.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub(crate) async fn from_response(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .unwrap_or_default();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// The response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// A response header's value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("response body is not valid JSON")
    }

    /// Assert the status code.
    pub fn assert_status(&self, expected: u16) {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "unexpected status; body: {}",
            self.text()
        );
    }
}
