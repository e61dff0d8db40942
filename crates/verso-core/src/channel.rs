//! Version signaling channels and the candidates they produce

use crate::version::{ApiVersion, VersionParseError};
use std::fmt;

/// The mechanism by which a client signaled a version.
///
/// The declaration order fixes the diagnostic precedence: a URL segment is
/// the most explicit signal, a media-type parameter the least. Precedence
/// orders conflict reports; it never silently picks a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// A matched path segment, e.g. `/api/v2/customers`.
    UrlSegment,
    /// A query parameter, e.g. `?api-version=2.0`.
    QueryString,
    /// A request header, e.g. `X-API-Version: 2.0`.
    Header,
    /// A media-type parameter on `Accept`, e.g. `application/json; version=2.0`.
    MediaType,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::UrlSegment => "url segment",
            Channel::QueryString => "query string",
            Channel::Header => "header",
            Channel::MediaType => "media type",
        };
        f.write_str(name)
    }
}

/// One channel's version signal, as extracted from a request.
///
/// Malformed tokens are preserved here rather than dropped, so the
/// combinator can surface them instead of masking a client bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    /// Where the token came from.
    pub channel: Channel,
    /// The raw token as the client sent it.
    pub raw: String,
    /// The parse result for the raw token.
    pub parsed: Result<ApiVersion, VersionParseError>,
}

impl VersionCandidate {
    /// Build a candidate by parsing `raw` as a version token.
    pub fn new(channel: Channel, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = raw.parse();
        Self { channel, raw, parsed }
    }
}
