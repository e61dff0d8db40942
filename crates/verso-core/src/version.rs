//! API version identifiers and the version token parser
//!
//! A version identifier is a `(major, minor)` pair. Clients may write it as
//! `"2.1"` or as a bare major `"2"` (minor defaults to 0). Parsing trims
//! surrounding whitespace and rejects anything else: empty tokens, signs,
//! non-numeric components, more than two dot-separated components.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A canonical API version: an ordered `(major, minor)` pair.
///
/// Ordered lexicographically by `(major, minor)`; equality is structural.
/// Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u16,
    minor: u16,
}

impl ApiVersion {
    /// Create a version from its components.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// The major component.
    pub const fn major(&self) -> u16 {
        self.major
    }

    /// The minor component.
    pub const fn minor(&self) -> u16 {
        self.minor
    }
}

/// Error produced when a raw token cannot be parsed as a version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// The token is not of the form `<major>[.<minor>]`.
    #[error("malformed version token: {0:?}")]
    Malformed(String),
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(VersionParseError::Malformed(raw.to_string()));
        }

        let mut components = token.split('.');
        let major = components.next().unwrap_or_default();
        let minor = components.next();
        if components.next().is_some() {
            return Err(VersionParseError::Malformed(raw.to_string()));
        }

        let major = parse_component(major).ok_or_else(|| {
            VersionParseError::Malformed(raw.to_string())
        })?;
        let minor = match minor {
            Some(m) => parse_component(m).ok_or_else(|| {
                VersionParseError::Malformed(raw.to_string())
            })?,
            None => 0,
        };

        Ok(ApiVersion { major, minor })
    }
}

/// Parse one numeric component, rejecting signs and empty strings.
///
/// `u16::from_str` accepts a leading `+`, which a version token must not.
fn parse_component(s: &str) -> Option<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// Versions appear in error bodies and metadata listings as "major.minor".
impl Serialize for ApiVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ApiVersion, VersionParseError> {
        s.parse()
    }

    #[test]
    fn parses_major_minor() {
        assert_eq!(parse("1.0"), Ok(ApiVersion::new(1, 0)));
        assert_eq!(parse("2.1"), Ok(ApiVersion::new(2, 1)));
        assert_eq!(parse("10.42"), Ok(ApiVersion::new(10, 42)));
    }

    #[test]
    fn bare_major_defaults_minor_to_zero() {
        assert_eq!(parse("3"), Ok(ApiVersion::new(3, 0)));
        assert_eq!(parse("0"), Ok(ApiVersion::new(0, 0)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse("  2.0 "), Ok(ApiVersion::new(2, 0)));
        assert_eq!(parse("\t1\n"), Ok(ApiVersion::new(1, 0)));
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(parse("one").is_err());
        assert!(parse("1.x").is_err());
        assert!(parse("v1").is_err());
        assert!(parse("1.").is_err());
        assert!(parse(".5").is_err());
    }

    #[test]
    fn rejects_signs() {
        assert!(parse("-1").is_err());
        assert!(parse("+1.0").is_err());
        assert!(parse("1.-2").is_err());
    }

    #[test]
    fn rejects_more_than_two_components() {
        assert!(parse("1.2.3").is_err());
        assert!(parse("1.0.0.0").is_err());
    }

    #[test]
    fn ordering_is_lexicographic_on_major_then_minor() {
        assert!(ApiVersion::new(1, 9) < ApiVersion::new(2, 0));
        assert!(ApiVersion::new(2, 0) < ApiVersion::new(2, 1));
        assert_eq!(ApiVersion::new(2, 0), ApiVersion::new(2, 0));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(ApiVersion::new(1, 0).to_string(), "1.0");
        assert_eq!(ApiVersion::new(3, 14).to_string(), "3.14");
    }

    #[test]
    fn malformed_error_carries_original_token() {
        match parse(" 1.2.3 ") {
            Err(VersionParseError::Malformed(tok)) => assert_eq!(tok, " 1.2.3 "),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }
}
