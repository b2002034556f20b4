//! Live TLS probe seam and per-domain summary report.
//!
//! The handshake itself is out of scope; [`TlsProbe`] is the boundary where a
//! real TLS client (or a test stub) hands over the peer chain. Everything
//! downstream of the trait runs through the normal core parse pipeline.

use async_trait::async_trait;
use certlab_core::parser::parse_chain;
use certlab_core::pem::der_to_pem;
use certlab_core::{Certificate, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One certificate as presented by the TLS peer, leaf first.
#[derive(Debug, Clone)]
pub struct PeerCertificate {
    /// Raw DER bytes from the handshake
    pub der: Vec<u8>,
}

/// Certificate chain captured from a live TLS handshake.
#[derive(Debug, Clone)]
pub struct ProbedChain {
    pub hostname: String,
    pub port: u16,
    /// Peer certificates in presentation order (leaf first)
    pub certificates: Vec<PeerCertificate>,
    /// Negotiated protocol version, e.g. `"TLSv1.3"`, if the probe knows it
    pub tls_version: Option<String>,
    /// Negotiated cipher suite name, if the probe knows it
    pub cipher_suite: Option<String>,
}

/// Performs a TLS handshake against a host and returns the peer chain.
#[async_trait]
pub trait TlsProbe: Send + Sync {
    /// Connect to `hostname:port`, complete the handshake, and capture the
    /// presented certificate chain without validating it.
    async fn probe(&self, hostname: &str, port: u16) -> Result<ProbedChain>;
}

/// Convert a probed chain into parsed certificates via the PEM pipeline.
///
/// # Errors
///
/// Propagates DER/PEM conversion failures and `NoCertificatesParsed` when
/// every presented certificate is unparseable.
pub fn chain_from_probe(probed: &ProbedChain) -> Result<Vec<Certificate>> {
    let blocks: Vec<String> = probed
        .certificates
        .iter()
        .map(|c| der_to_pem(&c.der))
        .collect::<Result<_>>()?;
    parse_chain(&blocks.join("\n"))
}

/// Summary of a domain's leaf certificate, shaped for direct serialization.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub hostname: String,
    pub port: u16,
    /// Leaf subject CN, `"N/A"` when absent
    pub subject_cn: String,
    /// Leaf issuer CN, `"N/A"` when absent
    pub issuer_cn: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub is_expired: bool,
    pub serial_number: String,
    pub fingerprint_sha256: String,
    /// SAN values with the type prefix stripped (`example.com`, not
    /// `DNS:example.com`)
    pub subject_alt_names: Vec<String>,
    pub tls_version: Option<String>,
    pub cipher_suite: Option<String>,
    pub chain_length: usize,
}

impl DomainReport {
    /// Build a report from a probed and parsed chain. The first certificate
    /// is taken as the leaf.
    #[must_use]
    pub fn from_chain(probed: &ProbedChain, chain: &[Certificate]) -> Option<Self> {
        let leaf = chain.first()?;
        Some(Self {
            hostname: probed.hostname.clone(),
            port: probed.port,
            subject_cn: leaf
                .subject
                .common_name()
                .unwrap_or("N/A")
                .to_string(),
            issuer_cn: leaf.issuer.common_name().unwrap_or("N/A").to_string(),
            not_before: leaf.not_before,
            not_after: leaf.not_after,
            days_until_expiry: leaf.days_until_expiry(),
            is_expired: leaf.is_expired(),
            serial_number: leaf.serial_number.clone(),
            fingerprint_sha256: leaf.fingerprint_sha256.clone(),
            subject_alt_names: leaf
                .subject_alt_names
                .iter()
                .map(|san| {
                    san.split_once(':')
                        .map_or(san.as_str(), |(_, value)| value)
                        .to_string()
                })
                .collect(),
            tls_version: probed.tls_version.clone(),
            cipher_suite: probed.cipher_suite.clone(),
            chain_length: chain.len(),
        })
    }
}
