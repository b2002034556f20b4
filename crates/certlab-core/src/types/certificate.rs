//! Parsed certificate model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Ordered distinguished-name attributes keyed by short name (CN, O, OU, ...).
///
/// X.509 does not guarantee key uniqueness; a later attribute with the same
/// key overwrites the earlier value in place (documented quirk, kept as-is).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameAttributes {
    entries: Vec<(String, String)>,
}

impl NameAttributes {
    /// Insert an attribute; a duplicate key overwrites the existing value
    /// while keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up an attribute by short name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The CN attribute, if present.
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.get("CN")
    }

    /// CN or `"Unknown"` when absent. Used for log lines.
    #[must_use]
    pub fn common_name_or_unknown(&self) -> &str {
        self.common_name().unwrap_or("Unknown")
    }

    /// Canonical form for name-equality comparison: attributes sorted by key,
    /// rendered as `key=value` and joined with `,`.
    ///
    /// This is a string-equality heuristic, not a cryptographic identity.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        pairs.sort_unstable();
        pairs.join(",")
    }

    /// Human-readable form in insertion order, `key=value` joined with `, `.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for NameAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Public key material extracted from the SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PublicKeyInfo {
    /// RSA key; modulus rendered as uppercase hex without leading zeros
    Rsa {
        /// Modulus n, uppercase hexadecimal
        modulus_hex: String,
        /// Public exponent e
        exponent: u64,
    },
    /// Elliptic-curve key
    Ec {
        /// Algorithm identifier OID (dotted form)
        algorithm_oid: String,
    },
    /// Anything else (DSA, GOST, unrecognized)
    Other {
        /// Algorithm identifier OID (dotted form)
        algorithm_oid: String,
    },
}

impl PublicKeyInfo {
    /// The RSA modulus as uppercase hex, if this is an RSA key.
    #[must_use]
    pub fn rsa_modulus_hex(&self) -> Option<&str> {
        match self {
            Self::Rsa { modulus_hex, .. } => Some(modulus_hex),
            _ => None,
        }
    }

    /// Short algorithm label for display.
    #[must_use]
    pub fn algorithm_name(&self) -> &str {
        match self {
            Self::Rsa { .. } => "RSA",
            Self::Ec { .. } => "EC",
            Self::Other { algorithm_oid } => algorithm_oid,
        }
    }
}

/// Decoded BasicConstraints extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    /// Whether the certificate may act as a CA
    pub is_ca: bool,
    /// Maximum number of intermediate certificates below this one
    pub path_len_constraint: Option<u32>,
}

/// Role of a certificate within a chain.
///
/// Derived per chain position, not stored on the certificate: index 0 and not
/// self-signed is a Leaf; self-signed is a Root regardless of position;
/// everything else is an Intermediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Leaf,
    Intermediate,
    Root,
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Leaf => "Leaf",
            Self::Intermediate => "Intermediate",
            Self::Root => "Root",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// A parsed X.509 certificate, immutable once built.
///
/// Fingerprints and the self-signed flag are computed once at parse time from
/// the exact DER bytes the certificate arrived in.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    /// Serial number as uppercase hex, as presented by the source encoding
    pub serial_number: String,
    /// Subject distinguished-name attributes
    pub subject: NameAttributes,
    /// Issuer distinguished-name attributes
    pub issuer: NameAttributes,
    /// Start of the validity window (UTC)
    pub not_before: DateTime<Utc>,
    /// End of the validity window (UTC); `not_before <= not_after`
    pub not_after: DateTime<Utc>,
    /// Public key material
    pub public_key: PublicKeyInfo,
    /// Subject Alternative Names with `DNS:`/`IP:`/`URI:`/`Email:` prefixes
    pub subject_alt_names: Vec<String>,
    /// Named KeyUsage flags, empty if the extension is absent
    pub key_usage: Vec<String>,
    /// Named ExtendedKeyUsage flags, empty if the extension is absent
    pub extended_key_usage: Vec<String>,
    /// BasicConstraints, if the extension is present and decodable
    pub basic_constraints: Option<BasicConstraints>,
    /// CA-Issuers URL from the Authority Information Access extension
    pub authority_info_access_url: Option<String>,
    /// Exact DER bytes the certificate was parsed from
    pub raw_der: Vec<u8>,
    /// The PEM block the certificate was extracted from
    pub raw_pem: String,
    /// SHA-1 over `raw_der`, colon-separated uppercase hex
    pub fingerprint_sha1: String,
    /// SHA-256 over `raw_der`, colon-separated uppercase hex
    pub fingerprint_sha256: String,
    /// Base64 SHA-256 of the DER SubjectPublicKeyInfo (HPKP pin-sha256)
    pub spki_pin_sha256: String,
    /// Whether subject and issuer names are equal (canonical string
    /// comparison; this is NOT a signature check)
    pub is_self_signed: bool,
}

impl Certificate {
    /// Days until the certificate expires; negative once expired.
    #[must_use]
    pub fn days_until_expiry(&self) -> i64 {
        (self.not_after - Utc::now()).num_days()
    }

    /// Whether the validity window has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.not_after
    }
}
