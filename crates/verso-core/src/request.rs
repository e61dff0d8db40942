//! Request wrapper consumed by version readers and handlers

use bytes::Bytes;
use http::{request::Parts, Extensions, HeaderMap, Method, Uri};
use std::collections::HashMap;
use std::sync::Arc;

/// An inbound HTTP request, paired with the path parameters the routing
/// layer matched and the application state handlers may extract.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Option<Bytes>,
    pub(crate) state: Arc<Extensions>,
    pub(crate) path_params: HashMap<String, String>,
}

impl Request {
    /// Create a new request from parts.
    pub fn new(
        parts: Parts,
        body: Bytes,
        state: Arc<Extensions>,
        path_params: HashMap<String, String>,
    ) -> Self {
        Self {
            parts,
            body: Some(body),
            state,
            path_params,
        }
    }

    /// Get the HTTP method.
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Get the URI.
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Get the request path.
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the query string.
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Get request extensions.
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Get mutable extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Take the body bytes (can only be called once).
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    /// Get path parameters matched by the routing layer.
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Get a specific path parameter.
    pub fn path_param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// Get shared application state.
    pub fn state(&self) -> &Arc<Extensions> {
        &self.state
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_request(uri: &str, headers: &[(&str, &str)]) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let (parts, _) = builder.body(()).expect("test request").into_parts();
    Request::new(parts, Bytes::new(), Arc::new(Extensions::new()), HashMap::new())
}
