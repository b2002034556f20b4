//! Chain role classification and local (name-linkage) verification.
//!
//! This is deliberately NOT cryptographic chain-of-trust validation: no
//! signature is verified, no revocation is checked, no trust store is
//! consulted. The verifier reasons only about subject/issuer name equality
//! and validity windows, so two unrelated certificates with identical name
//! strings would pass the linkage check.

use chrono::Utc;

use crate::types::{Certificate, CheckEvent, Role, VerificationReport};

/// Assign a role to each certificate in an ordered chain.
///
/// Index 0 that is not self-signed is the Leaf; any self-signed certificate
/// is a Root regardless of position (a single self-signed certificate is a
/// Root, not a Leaf); everything else is an Intermediate.
#[must_use]
pub fn classify(chain: &[Certificate]) -> Vec<Role> {
    chain
        .iter()
        .enumerate()
        .map(|(i, cert)| role_of(i, cert))
        .collect()
}

fn role_of(index: usize, cert: &Certificate) -> Role {
    if cert.is_self_signed {
        Role::Root
    } else if index == 0 {
        Role::Leaf
    } else {
        Role::Intermediate
    }
}

/// Verify an ordered chain by validity windows and name linkage.
///
/// Emits one date-check event per certificate, at most one linkage event per
/// adjacent pair, then a terminal event about the end of the chain. The
/// report is pure output; nothing is cached.
#[must_use]
pub fn verify_chain(chain: &[Certificate]) -> VerificationReport {
    let mut events = Vec::new();
    let mut valid = !chain.is_empty();
    let now = Utc::now();

    for (i, cert) in chain.iter().enumerate() {
        let role = role_of(i, cert);
        let subject_cn = cert.subject.common_name_or_unknown().to_string();

        if now < cert.not_before {
            valid = false;
            events.push(CheckEvent::NotYetValid { role, subject_cn });
        } else if now > cert.not_after {
            valid = false;
            events.push(CheckEvent::Expired { role, subject_cn });
        } else {
            events.push(CheckEvent::WithinValidity { role, subject_cn });
        }

        // Linkage to the next certificate: the chain is assumed to be in
        // Leaf -> Intermediate -> Root order as provided by the caller.
        if let Some(parent) = chain.get(i + 1) {
            let child_cn = cert.subject.common_name_or_unknown().to_string();
            if cert.issuer.canonical() == parent.subject.canonical() {
                events.push(CheckEvent::LinkVerified {
                    child_cn,
                    parent_cn: parent.subject.common_name_or_unknown().to_string(),
                });
            } else {
                valid = false;
                events.push(CheckEvent::BrokenChain {
                    index: i,
                    child_cn,
                    claimed_issuer: cert.issuer.display_name(),
                    actual_subject: parent.subject.display_name(),
                });
            }
        }
    }

    match chain.last() {
        Some(last) if last.is_self_signed => events.push(CheckEvent::RootReached {
            subject_cn: last.subject.common_name_or_unknown().to_string(),
        }),
        Some(_) => events.push(CheckEvent::IncompleteChain),
        None => {}
    }

    VerificationReport { valid, events }
}
