//! # verso-core
//!
//! Multi-strategy API version negotiation and dispatch.
//!
//! A client may signal the desired API version through any of four
//! channels: a URL path segment, a query parameter, a request header, or a
//! media-type parameter on `Accept`. This crate resolves those signals into
//! a single effective version, validates it against the versions registered
//! for the route, and dispatches to the matching handler variant, reporting
//! version metadata on the way out.
//!
//! Agreeing signals across channels are fine; disagreeing or malformed
//! signals fail closed with a structured 400 rather than being silently
//! resolved by precedence.

mod app;
mod channel;
mod dispatch;
mod error;
mod extract;
mod handler;
mod negotiate;
mod registry;
mod request;
mod resolve;
mod response;
mod router;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;
mod version;

// Public API
pub use app::{App, AppBuilder};
pub use channel::{Channel, VersionCandidate};
pub use dispatch::{
    Dispatcher, DEPRECATED_HEADER, EFFECTIVE_VERSION_HEADER, SUPPORTED_VERSIONS_HEADER,
};
pub use error::{ApiError, Result};
pub use extract::{
    Candidates, HeaderReader, MediaTypeReader, QueryStringReader, ReaderSet, UrlSegmentReader,
    VersionReader,
};
pub use handler::{EffectiveVersion, FromRequestParts, Handler, State};
pub use negotiate::{negotiate, NegotiationOutcome, NegotiationPolicy, RejectReason};
pub use registry::{RegistryBuilder, RegistryError, RouteVersions, VariantEntry, VariantRegistry};
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use resolve::{combine, Resolution};
pub use router::{RouteHit, RouteTable, RouteTableError};
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
pub use version::{ApiVersion, VersionParseError};
