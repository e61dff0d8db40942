//! Version negotiation: defaulting and supported-version validation

use crate::resolve::Resolution;
use crate::version::ApiVersion;
use std::collections::BTreeSet;

/// Why negotiation rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No version was signaled and no usable default exists.
    NoMatchingVariant,
    /// Channels carried conflicting or malformed version signals.
    AmbiguousInput,
    /// A well-formed version that is not registered for the route.
    UnsupportedVersion,
}

impl RejectReason {
    /// Stable identifier used in error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoMatchingVariant => "no_matching_variant",
            RejectReason::AmbiguousInput => "ambiguous_version",
            RejectReason::UnsupportedVersion => "unsupported_version",
        }
    }
}

/// The negotiated result for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationOutcome {
    /// The single version chosen to serve the request.
    Effective(ApiVersion),
    /// Negotiation failed; no handler may run.
    Rejected(RejectReason),
}

/// Defaulting behavior applied when a request signals no version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationPolicy {
    /// Version assumed for unversioned requests.
    pub default_version: ApiVersion,
    /// Whether unversioned requests fall back to the default at all.
    pub assume_default_when_unspecified: bool,
}

impl NegotiationPolicy {
    /// Assume `default_version` for unversioned requests.
    pub fn assume_default(default_version: ApiVersion) -> Self {
        Self {
            default_version,
            assume_default_when_unspecified: true,
        }
    }

    /// Require an explicit version on every request.
    pub fn require_explicit(default_version: ApiVersion) -> Self {
        Self {
            default_version,
            assume_default_when_unspecified: false,
        }
    }
}

/// Apply defaulting and supported-version validation to a resolution.
///
/// Pure given its inputs; `supported` is the matched route's registered
/// version set, not global state. Ambiguity is never silently resolved,
/// whatever the policy says about defaults.
pub fn negotiate(
    resolution: &Resolution,
    supported: &BTreeSet<ApiVersion>,
    policy: &NegotiationPolicy,
) -> NegotiationOutcome {
    match resolution {
        Resolution::Ambiguous(_) => NegotiationOutcome::Rejected(RejectReason::AmbiguousInput),
        Resolution::Resolved(v) => {
            if supported.contains(v) {
                NegotiationOutcome::Effective(*v)
            } else {
                NegotiationOutcome::Rejected(RejectReason::UnsupportedVersion)
            }
        }
        Resolution::Unspecified => {
            if policy.assume_default_when_unspecified
                && supported.contains(&policy.default_version)
            {
                NegotiationOutcome::Effective(policy.default_version)
            } else {
                NegotiationOutcome::Rejected(RejectReason::NoMatchingVariant)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    fn supported(versions: &[(u16, u16)]) -> BTreeSet<ApiVersion> {
        versions.iter().map(|&(m, n)| ApiVersion::new(m, n)).collect()
    }

    #[test]
    fn resolved_supported_version_is_effective() {
        let outcome = negotiate(
            &Resolution::Resolved(ApiVersion::new(2, 0)),
            &supported(&[(1, 0), (2, 0), (3, 0)]),
            &NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
        );
        assert_eq!(outcome, NegotiationOutcome::Effective(ApiVersion::new(2, 0)));
    }

    #[test]
    fn resolved_unsupported_version_is_rejected() {
        let outcome = negotiate(
            &Resolution::Resolved(ApiVersion::new(9, 0)),
            &supported(&[(1, 0), (2, 0), (3, 0)]),
            &NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
        );
        assert_eq!(
            outcome,
            NegotiationOutcome::Rejected(RejectReason::UnsupportedVersion)
        );
    }

    #[test]
    fn unspecified_falls_back_to_default_when_assumed() {
        let outcome = negotiate(
            &Resolution::Unspecified,
            &supported(&[(1, 0), (2, 0)]),
            &NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
        );
        assert_eq!(outcome, NegotiationOutcome::Effective(ApiVersion::new(1, 0)));
    }

    #[test]
    fn unspecified_rejected_when_default_not_assumed() {
        let outcome = negotiate(
            &Resolution::Unspecified,
            &supported(&[(1, 0), (2, 0)]),
            &NegotiationPolicy::require_explicit(ApiVersion::new(1, 0)),
        );
        assert_eq!(
            outcome,
            NegotiationOutcome::Rejected(RejectReason::NoMatchingVariant)
        );
    }

    #[test]
    fn unspecified_rejected_when_default_unsupported() {
        let outcome = negotiate(
            &Resolution::Unspecified,
            &supported(&[(2, 0), (3, 0)]),
            &NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
        );
        assert_eq!(
            outcome,
            NegotiationOutcome::Rejected(RejectReason::NoMatchingVariant)
        );
    }

    #[test]
    fn ambiguity_is_rejected_regardless_of_policy() {
        let ambiguous = Resolution::Ambiguous(vec![
            (Channel::UrlSegment, "1.0".to_string()),
            (Channel::QueryString, "2.0".to_string()),
        ]);
        for policy in [
            NegotiationPolicy::assume_default(ApiVersion::new(1, 0)),
            NegotiationPolicy::require_explicit(ApiVersion::new(1, 0)),
        ] {
            let outcome = negotiate(&ambiguous, &supported(&[(1, 0), (2, 0)]), &policy);
            assert_eq!(
                outcome,
                NegotiationOutcome::Rejected(RejectReason::AmbiguousInput)
            );
        }
    }

    #[test]
    fn empty_supported_set_rejects_everything() {
        let none = supported(&[]);
        let policy = NegotiationPolicy::assume_default(ApiVersion::new(1, 0));
        assert_eq!(
            negotiate(&Resolution::Resolved(ApiVersion::new(1, 0)), &none, &policy),
            NegotiationOutcome::Rejected(RejectReason::UnsupportedVersion)
        );
        assert_eq!(
            negotiate(&Resolution::Unspecified, &none, &policy),
            NegotiationOutcome::Rejected(RejectReason::NoMatchingVariant)
        );
    }
}
