//! Certificate model builder: DER/PEM blocks into [`Certificate`] values.

use chrono::{DateTime, TimeZone, Utc};
use rsa::BigUint;
use tracing::{debug, warn};
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use crate::error::{CertLabError, Result};
use crate::fingerprint;
use crate::pem::{extract_pem_blocks, pem_to_der};
use crate::types::{BasicConstraints, Certificate, NameAttributes, PublicKeyInfo};

/// Authority Information Access extension OID.
const OID_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
/// id-ad-caIssuers access method OID.
const OID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Parse a single PEM certificate block into the structured model.
///
/// Extension decoding is best-effort: an extension whose structure cannot be
/// decoded is treated as absent, never as a hard failure of the certificate.
///
/// # Errors
///
/// `MalformedCertificate` on any PEM or ASN.1/X.509 structural violation.
pub fn parse_certificate(pem_block: &str) -> Result<Certificate> {
    let der = pem_to_der(pem_block).map_err(CertLabError::malformed)?;
    parse_der(&der, pem_block)
}

/// Parse raw DER certificate bytes, keeping the supplied PEM rendering.
fn parse_der(der: &[u8], pem_block: &str) -> Result<Certificate> {
    let (_, cert) = parse_x509_certificate(der).map_err(CertLabError::malformed)?;

    let subject = build_name(cert.subject());
    let issuer = build_name(cert.issuer());
    let is_self_signed = subject.canonical() == issuer.canonical();

    let not_before = asn1_to_utc(cert.validity().not_before);
    let not_after = asn1_to_utc(cert.validity().not_after);

    let spki = cert.public_key();
    let public_key = build_public_key(spki);
    let spki_pin_sha256 = fingerprint::spki_pin(spki.raw);

    let mut subject_alt_names = Vec::new();
    let mut key_usage = Vec::new();
    let mut extended_key_usage = Vec::new();
    let mut basic_constraints = None;
    let mut authority_info_access_url = None;

    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::SubjectAlternativeName(san) => {
                for gn in &san.general_names {
                    if let Some(entry) = format_general_name(gn) {
                        subject_alt_names.push(entry);
                    }
                }
            }
            ParsedExtension::KeyUsage(ku) => {
                key_usage = key_usage_names(ku);
            }
            ParsedExtension::ExtendedKeyUsage(eku) => {
                extended_key_usage = extended_key_usage_names(eku);
            }
            ParsedExtension::BasicConstraints(bc) => {
                basic_constraints = Some(BasicConstraints {
                    is_ca: bc.ca,
                    path_len_constraint: bc.path_len_constraint,
                });
            }
            ParsedExtension::AuthorityInfoAccess(aia) => {
                for ad in &aia.accessdescs {
                    if ad.access_method.to_id_string() == OID_AD_CA_ISSUERS {
                        if let GeneralName::URI(uri) = &ad.access_location {
                            authority_info_access_url = Some((*uri).to_string());
                            break;
                        }
                    }
                }
            }
            ParsedExtension::ParseError { .. } | ParsedExtension::UnsupportedExtension { .. } => {
                // Best-effort fallback: some AIA encodings fail structured
                // decoding; scan the raw value for a CA-issuers URL.
                if ext.oid.to_id_string() == OID_AUTHORITY_INFO_ACCESS
                    && authority_info_access_url.is_none()
                {
                    authority_info_access_url =
                        scan_crt_url(&String::from_utf8_lossy(ext.value));
                    if authority_info_access_url.is_none() {
                        debug!("AIA extension present but no CA-issuers URL recovered");
                    }
                }
            }
            _ => {}
        }
    }

    Ok(Certificate {
        serial_number: hex::encode(cert.raw_serial()).to_uppercase(),
        subject,
        issuer,
        not_before,
        not_after,
        public_key,
        subject_alt_names,
        key_usage,
        extended_key_usage,
        basic_constraints,
        authority_info_access_url,
        fingerprint_sha1: fingerprint::fingerprint_sha1(der),
        fingerprint_sha256: fingerprint::fingerprint_sha256(der),
        spki_pin_sha256,
        is_self_signed,
        raw_der: der.to_vec(),
        raw_pem: pem_block.to_string(),
    })
}

/// Parse every certificate block found in arbitrary text, preserving input
/// order; no reordering, no deduplication.
///
/// Blocks that individually fail to parse are logged and skipped.
///
/// # Errors
///
/// `EmptyInput` / `NoCertificatesFound` from block extraction, and
/// `NoCertificatesParsed` only when every extracted block failed.
pub fn parse_chain(text: &str) -> Result<Vec<Certificate>> {
    let blocks = extract_pem_blocks(text)?;

    let mut certs = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        match parse_certificate(block) {
            Ok(cert) => certs.push(cert),
            Err(e) => warn!(block = index + 1, error = %e, "skipping unparsable certificate block"),
        }
    }

    if certs.is_empty() {
        return Err(CertLabError::NoCertificatesParsed);
    }
    Ok(certs)
}

/// Map an attribute type OID to its registered short name.
fn short_name(oid: &str) -> Option<&'static str> {
    Some(match oid {
        "2.5.4.3" => "CN",
        "2.5.4.4" => "SN",
        "2.5.4.5" => "serialNumber",
        "2.5.4.6" => "C",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.9" => "street",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "2.5.4.12" => "title",
        "2.5.4.42" => "GN",
        "0.9.2342.19200300.100.1.1" => "UID",
        "0.9.2342.19200300.100.1.25" => "DC",
        "1.2.840.113549.1.9.1" => "E",
        _ => return None,
    })
}

/// Collect RDN attributes keyed by short name, falling back to the dotted
/// OID when none is registered. Duplicate keys are last-write-wins.
fn build_name(name: &X509Name<'_>) -> NameAttributes {
    let mut attrs = NameAttributes::default();
    for rdn in name.iter_rdn() {
        for attr in rdn.iter() {
            let oid = attr.attr_type().to_id_string();
            let key = short_name(&oid).map_or(oid, ToString::to_string);
            let value = attr.as_str().map_or_else(
                |_| String::from_utf8_lossy(attr.attr_value().data).into_owned(),
                ToString::to_string,
            );
            attrs.insert(key, value);
        }
    }
    attrs
}

fn build_public_key(spki: &SubjectPublicKeyInfo<'_>) -> PublicKeyInfo {
    let algorithm_oid = spki.algorithm.algorithm.to_id_string();
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => PublicKeyInfo::Rsa {
            modulus_hex: BigUint::from_bytes_be(rsa.modulus)
                .to_str_radix(16)
                .to_uppercase(),
            exponent: be_bytes_to_u64(rsa.exponent),
        },
        Ok(PublicKey::EC(_)) => PublicKeyInfo::Ec { algorithm_oid },
        _ => PublicKeyInfo::Other { algorithm_oid },
    }
}

/// Big-endian integer bytes to u64; RSA public exponents are small.
fn be_bytes_to_u64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .skip_while(|b| **b == 0)
        .fold(0u64, |acc, b| acc.wrapping_shl(8) | u64::from(*b))
}

/// Render a SAN entry with its type prefix; unhandled name forms are skipped.
fn format_general_name(gn: &GeneralName<'_>) -> Option<String> {
    match gn {
        GeneralName::DNSName(dns) => Some(format!("DNS:{dns}")),
        GeneralName::URI(uri) => Some(format!("URI:{uri}")),
        GeneralName::RFC822Name(email) => Some(format!("Email:{email}")),
        GeneralName::IPAddress(bytes) => Some(format!("IP:{}", format_ip(bytes))),
        _ => None,
    }
}

fn format_ip(bytes: &[u8]) -> String {
    match bytes.len() {
        4 => std::net::Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_string(),
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            std::net::Ipv6Addr::from(octets).to_string()
        }
        _ => hex::encode(bytes),
    }
}

fn key_usage_names(ku: &KeyUsage) -> Vec<String> {
    let flags: [(&str, bool); 9] = [
        ("Digital Signature", ku.digital_signature()),
        ("Non Repudiation", ku.non_repudiation()),
        ("Key Encipherment", ku.key_encipherment()),
        ("Data Encipherment", ku.data_encipherment()),
        ("Key Agreement", ku.key_agreement()),
        ("Certificate Sign", ku.key_cert_sign()),
        ("CRL Sign", ku.crl_sign()),
        ("Encipher Only", ku.encipher_only()),
        ("Decipher Only", ku.decipher_only()),
    ];
    flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

fn extended_key_usage_names(eku: &ExtendedKeyUsage<'_>) -> Vec<String> {
    let flags: [(&str, bool); 6] = [
        ("TLS Web Server Authentication", eku.server_auth),
        ("TLS Web Client Authentication", eku.client_auth),
        ("Code Signing", eku.code_signing),
        ("Email Protection", eku.email_protection),
        ("Time Stamping", eku.time_stamping),
        ("OCSP Signing", eku.ocsp_signing),
    ];
    flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

/// Find the first `http(s)://...crt` URL in a raw extension value.
///
/// Mirrors the loose scan used for AIA values that arrive as opaque strings:
/// the token runs until whitespace or a control byte and must end in `.crt`.
fn scan_crt_url(raw: &str) -> Option<String> {
    let mut search = raw;
    loop {
        let start = search.find("http")?;
        let token: &str = &search[start..];
        let end = token
            .find(|c: char| c.is_whitespace() || c.is_control())
            .unwrap_or(token.len());
        let token = &token[..end];

        if (token.starts_with("http://") || token.starts_with("https://")) && token.len() > 8 {
            if let Some(pos) = token.rfind(".crt") {
                return Some(token[..pos + 4].to_string());
            }
        }
        search = &search[start + 4..];
        if search.is_empty() {
            return None;
        }
    }
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: ASN1Time) -> DateTime<Utc> {
    let epoch = t.timestamp();
    Utc.timestamp_opt(epoch, 0).single().unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{
        CertificateParams, CustomExtension, DistinguishedName, DnType,
        ExtendedKeyUsagePurpose, IsCa, KeyPair, KeyUsagePurpose,
    };

    fn dn(cn: &str) -> DistinguishedName {
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        dn.push(DnType::OrganizationName, "CertLab Test");
        dn.push(DnType::CountryName, "IS");
        dn
    }

    fn self_signed(cn: &str) -> String {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        params.distinguished_name = dn(cn);
        params.is_ca = IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
        params.self_signed(&key).unwrap().pem()
    }

    /// Minimal DER AuthorityInfoAccess body with one CA-issuers entry.
    fn aia_content(url: &str) -> Vec<u8> {
        // id-ad-caIssuers 1.3.6.1.5.5.7.48.2
        const METHOD: &[u8] = &[0x06, 0x08, 0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
        assert!(url.len() < 120, "test URL too long for short-form lengths");

        let mut location = vec![0x86, u8::try_from(url.len()).unwrap()];
        location.extend_from_slice(url.as_bytes());

        let mut desc = vec![0x30, u8::try_from(METHOD.len() + location.len()).unwrap()];
        desc.extend_from_slice(METHOD);
        desc.extend_from_slice(&location);

        let mut out = vec![0x30, u8::try_from(desc.len()).unwrap()];
        out.extend_from_slice(&desc);
        out
    }

    #[test]
    fn parses_subject_and_issuer_attributes() {
        let pem = self_signed("Test Root");
        let cert = parse_certificate(&pem).unwrap();

        assert_eq!(cert.subject.get("CN"), Some("Test Root"));
        assert_eq!(cert.subject.get("O"), Some("CertLab Test"));
        assert_eq!(cert.subject.get("C"), Some("IS"));
        assert!(cert.is_self_signed);
        assert_eq!(cert.subject.canonical(), cert.issuer.canonical());
    }

    #[test]
    fn fingerprints_have_expected_shape() {
        let pem = self_signed("Test Root");
        let cert = parse_certificate(&pem).unwrap();

        assert_eq!(cert.fingerprint_sha1.len(), 20 * 3 - 1);
        assert_eq!(cert.fingerprint_sha256.len(), 32 * 3 - 1);
        assert!(cert.fingerprint_sha256.contains(':'));
        assert_eq!(cert.spki_pin_sha256.len(), 44);
        assert!(!cert.serial_number.is_empty());
    }

    #[test]
    fn reparsing_identical_bytes_is_idempotent() {
        let pem = self_signed("Idempotent");
        let a = parse_certificate(&pem).unwrap();
        let b = parse_certificate(&pem).unwrap();

        assert_eq!(a.fingerprint_sha1, b.fingerprint_sha1);
        assert_eq!(a.fingerprint_sha256, b.fingerprint_sha256);
        assert_eq!(a.spki_pin_sha256, b.spki_pin_sha256);
        assert_eq!(a.raw_der, b.raw_der);
    }

    #[test]
    fn decodes_san_and_usage_extensions() {
        let key = KeyPair::generate().unwrap();
        let mut params =
            CertificateParams::new(vec!["example.com".to_string(), "www.example.com".to_string()])
                .unwrap();
        params.distinguished_name = dn("example.com");
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
        ];
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        let pem = params.self_signed(&key).unwrap().pem();

        let cert = parse_certificate(&pem).unwrap();
        assert!(cert
            .subject_alt_names
            .contains(&"DNS:example.com".to_string()));
        assert!(cert
            .subject_alt_names
            .contains(&"DNS:www.example.com".to_string()));
        assert!(cert.key_usage.contains(&"Digital Signature".to_string()));
        assert!(cert.key_usage.contains(&"Key Encipherment".to_string()));
        assert_eq!(
            cert.extended_key_usage,
            vec!["TLS Web Server Authentication".to_string()]
        );
    }

    #[test]
    fn decodes_basic_constraints() {
        let pem = self_signed("CA With Constraints");
        let cert = parse_certificate(&pem).unwrap();

        let bc = cert.basic_constraints.expect("basicConstraints present");
        assert!(bc.is_ca);
        assert_eq!(bc.path_len_constraint, None);
    }

    #[test]
    fn extracts_aia_ca_issuers_url() {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        params.distinguished_name = dn("leaf.example.com");
        params.custom_extensions.push(CustomExtension::from_oid_content(
            &[1, 3, 6, 1, 5, 5, 7, 1, 1],
            aia_content("http://ca.example.com/issuer.crt"),
        ));
        let pem = params.self_signed(&key).unwrap().pem();

        let cert = parse_certificate(&pem).unwrap();
        assert_eq!(
            cert.authority_info_access_url.as_deref(),
            Some("http://ca.example.com/issuer.crt")
        );
    }

    #[test]
    fn default_key_is_reported_as_ec() {
        let pem = self_signed("EC Cert");
        let cert = parse_certificate(&pem).unwrap();
        assert!(matches!(cert.public_key, PublicKeyInfo::Ec { .. }));
        assert_eq!(cert.public_key.algorithm_name(), "EC");
    }

    #[test]
    fn malformed_block_is_rejected() {
        let bogus =
            "-----BEGIN CERTIFICATE-----\nAAAABBBBCCCC\n-----END CERTIFICATE-----";
        assert!(matches!(
            parse_certificate(bogus),
            Err(CertLabError::MalformedCertificate { .. })
        ));
    }

    #[test]
    fn chain_skips_bad_blocks_and_keeps_order() {
        let good1 = self_signed("First");
        let bad = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----";
        let good2 = self_signed("Second");
        let text = format!("{good1}\n{bad}\n{good2}");

        let chain = parse_chain(&text).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].subject.get("CN"), Some("First"));
        assert_eq!(chain[1].subject.get("CN"), Some("Second"));
    }

    #[test]
    fn chain_fails_when_every_block_fails() {
        let bad = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----";
        assert!(matches!(
            parse_chain(bad),
            Err(CertLabError::NoCertificatesParsed)
        ));
    }

    #[test]
    fn url_scan_handles_raw_aia_values() {
        assert_eq!(
            scan_crt_url("\x02\x01x0\x1fhttp://cacerts.example.com/int.crt\x00rest"),
            Some("http://cacerts.example.com/int.crt".to_string())
        );
        assert_eq!(scan_crt_url("no url here"), None);
        assert_eq!(scan_crt_url("http://example.com/page.html"), None);
    }
}
