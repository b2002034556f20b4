//! Certificate fingerprints and SPKI pins via `ring::digest`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY, SHA256};

/// Colon-separated uppercase hex rendering of a digest, `AB:CD:...`.
fn colon_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// SHA-1 fingerprint over the full DER encoding.
///
/// SHA-1 is kept for display parity with common tooling, not for any
/// security decision.
#[must_use]
pub fn fingerprint_sha1(der: &[u8]) -> String {
    colon_hex(digest(&SHA1_FOR_LEGACY_USE_ONLY, der).as_ref())
}

/// SHA-256 fingerprint over the full DER encoding.
#[must_use]
pub fn fingerprint_sha256(der: &[u8]) -> String {
    colon_hex(digest(&SHA256, der).as_ref())
}

/// HPKP-style pin: base64 of SHA-256 over the DER SubjectPublicKeyInfo
/// (algorithm identifier + public key bit string), usable directly in a
/// `pin-sha256` directive.
#[must_use]
pub fn spki_pin(spki_der: &[u8]) -> String {
    BASE64.encode(digest(&SHA256, spki_der).as_ref())
}
