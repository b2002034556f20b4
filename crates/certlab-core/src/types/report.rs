//! Verification report produced by the local chain verifier.

use serde::Serialize;
use std::fmt;

use super::Role;

/// A single finding emitted while walking a chain.
///
/// Events are emitted in certificate order: one date-check event followed by
/// at most one linkage event per certificate, then exactly one terminal event
/// about the end of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckEvent {
    /// The certificate's validity window starts in the future
    NotYetValid { role: Role, subject_cn: String },
    /// The certificate's validity window has passed
    Expired { role: Role, subject_cn: String },
    /// Wall-clock time falls inside the validity window
    WithinValidity { role: Role, subject_cn: String },
    /// Issuer of this certificate matches the subject of the next one
    LinkVerified { child_cn: String, parent_cn: String },
    /// Issuer of this certificate does not match the subject of the next one
    BrokenChain {
        /// Index of the child certificate in the chain
        index: usize,
        child_cn: String,
        /// Issuer name the child claims
        claimed_issuer: String,
        /// Subject name of the certificate that actually follows
        actual_subject: String,
    },
    /// The chain terminates with a self-signed root
    RootReached { subject_cn: String },
    /// The last certificate is not self-signed; warning only, not a failure
    IncompleteChain,
}

impl CheckEvent {
    /// Whether this event flips the overall verdict to invalid.
    ///
    /// An incomplete chain is deliberately a warning: many legitimate
    /// deployments omit the root.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NotYetValid { .. } | Self::Expired { .. } | Self::BrokenChain { .. }
        )
    }
}

impl fmt::Display for CheckEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetValid { role, subject_cn } => {
                write!(f, "[{role}] Cert {subject_cn} is not yet valid (Future date).")
            }
            Self::Expired { role, subject_cn } => {
                write!(f, "[{role}] Cert {subject_cn} has EXPIRED.")
            }
            Self::WithinValidity { role, subject_cn } => {
                write!(f, "[{role}] Cert {subject_cn} is within validity period.")
            }
            Self::LinkVerified { child_cn, parent_cn } => {
                write!(f, "[Link Verified] {child_cn} is issued by {parent_cn}.")
            }
            Self::BrokenChain {
                child_cn,
                claimed_issuer,
                actual_subject,
                ..
            } => write!(
                f,
                "[Broken Chain] {child_cn} claims issuer is {claimed_issuer}, but next cert is {actual_subject}."
            ),
            Self::RootReached { subject_cn } => write!(
                f,
                "[Root] Chain terminates with a self-signed root: {subject_cn}."
            ),
            Self::IncompleteChain => write!(
                f,
                "[Warning] Chain does not end with a self-signed root certificate (Incomplete chain?)."
            ),
        }
    }
}

/// Outcome of a local chain verification pass.
///
/// Produced fresh on every call; pure output over a chain, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Conjunction of: no expired, no not-yet-valid, no broken link
    pub valid: bool,
    /// Findings in deterministic certificate order
    pub events: Vec<CheckEvent>,
}

impl VerificationReport {
    /// Render every event as a log line, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}
