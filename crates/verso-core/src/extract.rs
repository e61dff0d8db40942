//! Version readers: one candidate extractor per signaling channel
//!
//! Each reader inspects exactly one field of the request and produces at
//! most one [`VersionCandidate`]. Readers are side-effect free, never infer
//! from another channel, and preserve malformed tokens so the combinator can
//! report them.

use crate::channel::{Channel, VersionCandidate};
use crate::request::Request;
use smallvec::SmallVec;

/// Per-request candidate list. Four channels at most.
pub type Candidates = SmallVec<[VersionCandidate; 4]>;

/// Reads one channel of an inbound request for a version token.
pub trait VersionReader: Send + Sync {
    /// The channel this reader inspects.
    fn channel(&self) -> Channel;

    /// Extract the channel's candidate, or `None` if the channel is absent.
    fn read(&self, req: &Request) -> Option<VersionCandidate>;
}

/// Reads the version from a matched path parameter.
///
/// The route template carries the parameter, e.g. `/api/{version}/customers`;
/// the matched segment is typically written `v2` or `v2.0`, so a single
/// leading `v`/`V` is stripped before parsing.
pub struct UrlSegmentReader {
    param: String,
}

impl UrlSegmentReader {
    /// Read the path parameter named `param`.
    pub fn new(param: impl Into<String>) -> Self {
        Self { param: param.into() }
    }
}

impl Default for UrlSegmentReader {
    fn default() -> Self {
        Self::new("version")
    }
}

impl VersionReader for UrlSegmentReader {
    fn channel(&self) -> Channel {
        Channel::UrlSegment
    }

    fn read(&self, req: &Request) -> Option<VersionCandidate> {
        let segment = req.path_param(&self.param)?;
        let token = segment
            .strip_prefix(['v', 'V'])
            .unwrap_or(segment.as_str());
        Some(VersionCandidate::new(Channel::UrlSegment, token))
    }
}

/// Reads the version from a named query parameter, first occurrence.
pub struct QueryStringReader {
    name: String,
}

impl QueryStringReader {
    /// Read the query parameter named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for QueryStringReader {
    fn default() -> Self {
        Self::new("api-version")
    }
}

impl VersionReader for QueryStringReader {
    fn channel(&self) -> Channel {
        Channel::QueryString
    }

    fn read(&self, req: &Request) -> Option<VersionCandidate> {
        let query = req.query_string()?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
        pairs
            .into_iter()
            .find(|(name, _)| name == &self.name)
            .map(|(_, value)| VersionCandidate::new(Channel::QueryString, value))
    }
}

/// Reads the version from a named request header, first occurrence.
pub struct HeaderReader {
    name: String,
}

impl HeaderReader {
    /// Read the header named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HeaderReader {
    fn default() -> Self {
        Self::new("x-api-version")
    }
}

impl VersionReader for HeaderReader {
    fn channel(&self) -> Channel {
        Channel::Header
    }

    fn read(&self, req: &Request) -> Option<VersionCandidate> {
        let value = req.headers().get(&self.name)?;
        // Non-UTF-8 header bytes become a candidate that fails to parse,
        // surfacing as an explicit rejection instead of vanishing.
        let raw = String::from_utf8_lossy(value.as_bytes()).into_owned();
        Some(VersionCandidate::new(Channel::Header, raw))
    }
}

/// Reads the version from a media-type parameter on the `Accept` header,
/// e.g. `Accept: application/json; version=2.0`.
///
/// All media ranges of the header are scanned in order; the first occurrence
/// of the named parameter wins. Quoted parameter values are unquoted.
pub struct MediaTypeReader {
    param: String,
}

impl MediaTypeReader {
    /// Read the media-type parameter named `param`.
    pub fn new(param: impl Into<String>) -> Self {
        Self { param: param.into() }
    }
}

impl Default for MediaTypeReader {
    fn default() -> Self {
        Self::new("version")
    }
}

impl VersionReader for MediaTypeReader {
    fn channel(&self) -> Channel {
        Channel::MediaType
    }

    fn read(&self, req: &Request) -> Option<VersionCandidate> {
        let accept = req.headers().get(http::header::ACCEPT)?;
        let accept = accept.to_str().ok()?;

        for media_range in accept.split(',') {
            // Parameters follow the type/subtype, separated by semicolons.
            for param in media_range.split(';').skip(1) {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case(&self.param) {
                    let token = value.trim().trim_matches('"');
                    return Some(VersionCandidate::new(Channel::MediaType, token));
                }
            }
        }
        None
    }
}

/// The full reader set: all four channels with their configured names.
///
/// Readers run independently over immutable request data, so evaluation
/// order cannot change the outcome, only candidate ordering; candidates are
/// collected in channel precedence order.
pub struct ReaderSet {
    readers: Vec<Box<dyn VersionReader>>,
}

impl ReaderSet {
    /// All four channels with their conventional field names:
    /// path parameter `version`, query `api-version`, header
    /// `x-api-version`, media-type parameter `version`.
    pub fn all() -> Self {
        Self {
            readers: vec![
                Box::new(UrlSegmentReader::default()),
                Box::new(QueryStringReader::default()),
                Box::new(HeaderReader::default()),
                Box::new(MediaTypeReader::default()),
            ],
        }
    }

    /// A custom reader combination, e.g. a subset of channels or
    /// non-default field names.
    pub fn combine(readers: Vec<Box<dyn VersionReader>>) -> Self {
        Self { readers }
    }

    /// Run every reader over the request and collect present candidates.
    pub fn read(&self, req: &Request) -> Candidates {
        self.readers.iter().filter_map(|r| r.read(req)).collect()
    }
}
