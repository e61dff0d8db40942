//! Dispatch: extract, combine, negotiate, invoke, annotate
//!
//! One request moves through extraction, combination and negotiation, then
//! either into the registered handler variant or into a structured 4xx.
//! Resolution is deterministic for identical request fields; no handler ever
//! runs for an unresolved version.

use crate::error::ApiError;
use crate::extract::ReaderSet;
use crate::negotiate::{negotiate, NegotiationOutcome, NegotiationPolicy};
use crate::registry::VariantRegistry;
use crate::request::Request;
use crate::resolve::combine;
use crate::response::{IntoResponse, Response};
use crate::version::ApiVersion;
use http::HeaderValue;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Response header carrying the version that served the request.
pub const EFFECTIVE_VERSION_HEADER: &str = "api-effective-version";
/// Response header listing every version the route supports.
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";
/// Response header flagging that the effective version is deprecated.
pub const DEPRECATED_HEADER: &str = "api-version-deprecated";

/// Resolves a version for each request and routes it to the matching
/// handler variant.
///
/// Holds only read-only data (`Arc`-shared registry, reader configuration,
/// policy), so concurrent requests dispatch without synchronization.
pub struct Dispatcher {
    registry: Arc<VariantRegistry>,
    readers: ReaderSet,
    policy: NegotiationPolicy,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry with the default four
    /// readers.
    pub fn new(registry: Arc<VariantRegistry>, policy: NegotiationPolicy) -> Self {
        Self {
            registry,
            readers: ReaderSet::all(),
            policy,
        }
    }

    /// Replace the reader set, e.g. to rename the header or query field.
    pub fn with_readers(mut self, readers: ReaderSet) -> Self {
        self.readers = readers;
        self
    }

    /// The registry this dispatcher serves from.
    pub fn registry(&self) -> &Arc<VariantRegistry> {
        &self.registry
    }

    /// Serve one request already matched to `route_template` by the
    /// routing layer.
    pub async fn dispatch(&self, route_template: &str, mut req: Request) -> Response {
        let candidates = self.readers.read(&req);
        let resolution = combine(&candidates);
        let supported = self.registry.supported_versions(route_template);

        match negotiate(&resolution, &supported, &self.policy) {
            NegotiationOutcome::Effective(version) => {
                // Supported versions come from the registry, so the lookup
                // can only miss if the route is unknown entirely.
                let Some(entry) = self.registry.lookup(route_template, version) else {
                    warn!(route = route_template, "no variant registered for route");
                    return ApiError::not_found(format!(
                        "No handler registered for {}",
                        route_template
                    ))
                    .into_response();
                };

                debug!(
                    route = route_template,
                    version = %version,
                    "version negotiated"
                );

                let deprecated = entry.is_deprecated();
                let handler = entry.handler.clone();
                req.extensions_mut().insert(version);

                let mut response = (*handler)(req).await;
                annotate(&mut response, version, &supported, deprecated);
                response
            }
            NegotiationOutcome::Rejected(reason) => {
                debug!(
                    route = route_template,
                    reason = reason.as_str(),
                    "version negotiation rejected"
                );
                ApiError::rejection(reason, supported.into_iter().collect()).into_response()
            }
        }
    }
}

/// Attach version-reporting metadata to a successful response.
fn annotate(
    response: &mut Response,
    effective: ApiVersion,
    supported: &BTreeSet<ApiVersion>,
    deprecated: bool,
) {
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&effective.to_string()) {
        headers.insert(EFFECTIVE_VERSION_HEADER, value);
    }

    let listed = supported
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&listed) {
        headers.insert(SUPPORTED_VERSIONS_HEADER, value);
    }

    if deprecated {
        headers.insert(DEPRECATED_HEADER, HeaderValue::from_static("true"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::request::test_request;
    use http::StatusCode;

    async fn orders_v1() -> &'static str {
        "orders v1"
    }
    async fn orders_v2() -> &'static str {
        "orders v2"
    }

    fn dispatcher() -> Dispatcher {
        let registry = RegistryBuilder::new()
            .deprecated_variant("/api/orders", ApiVersion::new(1, 0), orders_v1)
            .unwrap()
            .variant("/api/orders", ApiVersion::new(2, 0), orders_v2)
            .unwrap()
            .build();
        Dispatcher::new(
            Arc::new(registry),
            NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
        )
    }

    #[tokio::test]
    async fn effective_version_invokes_variant_and_annotates() {
        let d = dispatcher();
        let req = test_request("/api/orders", &[("x-api-version", "2.0")]);
        let response = d.dispatch("/api/orders", req).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(EFFECTIVE_VERSION_HEADER).unwrap(),
            "2.0"
        );
        assert_eq!(
            response.headers().get(SUPPORTED_VERSIONS_HEADER).unwrap(),
            "1.0, 2.0"
        );
        assert!(response.headers().get(DEPRECATED_HEADER).is_none());
    }

    #[tokio::test]
    async fn deprecated_effective_version_is_flagged() {
        let d = dispatcher();
        let req = test_request("/api/orders", &[("x-api-version", "1.0")]);
        let response = d.dispatch("/api/orders", req).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(DEPRECATED_HEADER).unwrap(), "true");
    }

    #[tokio::test]
    async fn unversioned_request_uses_default() {
        let d = dispatcher();
        let req = test_request("/api/orders", &[]);
        let response = d.dispatch("/api/orders", req).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(EFFECTIVE_VERSION_HEADER).unwrap(),
            "1.0"
        );
    }

    #[tokio::test]
    async fn conflicting_channels_fail_closed() {
        let d = dispatcher();
        let req = test_request("/api/orders?api-version=2.0", &[("x-api-version", "1.0")]);
        let response = d.dispatch("/api/orders", req).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(EFFECTIVE_VERSION_HEADER).is_none());
    }

    #[tokio::test]
    async fn unsupported_version_is_rejected_with_supported_list() {
        let d = dispatcher();
        let req = test_request("/api/orders", &[("x-api-version", "9.0")]);
        let response = d.dispatch("/api/orders", req).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dispatch_is_idempotent_for_identical_requests() {
        let d = dispatcher();
        let first = d
            .dispatch("/api/orders", test_request("/api/orders", &[("x-api-version", "2.0")]))
            .await;
        let second = d
            .dispatch("/api/orders", test_request("/api/orders", &[("x-api-version", "2.0")]))
            .await;
        assert_eq!(first.status(), second.status());
        assert_eq!(
            first.headers().get(EFFECTIVE_VERSION_HEADER),
            second.headers().get(EFFECTIVE_VERSION_HEADER)
        );
    }
}
