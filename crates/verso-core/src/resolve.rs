//! Combining per-channel candidates into a single resolution
//!
//! Agreement, not source, determines success: any number of channels may
//! carry the same version. Disagreement or a malformed token is reported as
//! ambiguous rather than silently resolved by precedence, because version
//! selection changes response shape and a hidden client misconfiguration is
//! worse than an explicit 400.

use crate::channel::{Channel, VersionCandidate};
use crate::version::ApiVersion;

/// The outcome of merging all channel candidates for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every present candidate parsed to the same version.
    Resolved(ApiVersion),
    /// Present candidates disagree, or at least one failed to parse.
    /// Carries every present `(channel, raw token)` pair, including
    /// channels that agree with one of the disputed values: the report
    /// shows everything the client sent. Pairs are ordered by channel
    /// precedence for deterministic error reporting.
    Ambiguous(Vec<(Channel, String)>),
    /// No channel carried a version.
    Unspecified,
}

/// Merge candidates under the agreement policy.
pub fn combine(candidates: &[VersionCandidate]) -> Resolution {
    if candidates.is_empty() {
        return Resolution::Unspecified;
    }

    let mut agreed: Option<ApiVersion> = None;
    let mut conflicted = false;

    for candidate in candidates {
        match (&candidate.parsed, agreed) {
            (Err(_), _) => conflicted = true,
            (Ok(v), None) => agreed = Some(*v),
            (Ok(v), Some(prev)) if *v != prev => conflicted = true,
            (Ok(_), Some(_)) => {}
        }
    }

    if conflicted {
        let mut pairs: Vec<(Channel, String)> = candidates
            .iter()
            .map(|c| (c.channel, c.raw.clone()))
            .collect();
        pairs.sort_by_key(|(channel, _)| *channel);
        return Resolution::Ambiguous(pairs);
    }

    match agreed {
        Some(v) => Resolution::Resolved(v),
        // Unreachable in practice: a non-empty candidate list with no
        // agreed version and no conflict cannot be constructed.
        None => Resolution::Unspecified,
    }
}
