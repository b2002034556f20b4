//! Static table of well-known root-CA certificate download URLs.
//!
//! Process-wide read-only configuration: consulted when a certificate has no
//! AIA CA-Issuers URL but its issuer CN names a recognizable public root.

/// Root certificate download URLs of the major Certificate Authorities,
/// keyed by the exact subject CN of the root.
const KNOWN_ROOT_URLS: &[(&str, &str)] = &[
    // DigiCert
    ("DigiCert Global Root CA", "http://cacerts.digicert.com/DigiCertGlobalRootCA.crt"),
    ("DigiCert Global Root G2", "http://cacerts.digicert.com/DigiCertGlobalRootG2.crt"),
    ("DigiCert Global Root G3", "http://cacerts.digicert.com/DigiCertGlobalRootG3.crt"),
    ("DigiCert High Assurance EV Root CA", "http://cacerts.digicert.com/DigiCertHighAssuranceEVRootCA.crt"),
    ("DigiCert Assured ID Root CA", "http://cacerts.digicert.com/DigiCertAssuredIDRootCA.crt"),
    ("DigiCert Assured ID Root G2", "http://cacerts.digicert.com/DigiCertAssuredIDRootG2.crt"),
    ("DigiCert Assured ID Root G3", "http://cacerts.digicert.com/DigiCertAssuredIDRootG3.crt"),
    ("DigiCert Trusted Root G4", "http://cacerts.digicert.com/DigiCertTrustedRootG4.crt"),
    // GeoTrust
    ("GeoTrust Global CA", "http://cacerts.geotrust.com/GeoTrustGlobalCA.crt"),
    ("GeoTrust Primary Certification Authority", "http://cacerts.geotrust.com/GeoTrustPCA.crt"),
    ("GeoTrust Primary Certification Authority - G2", "http://cacerts.geotrust.com/GeoTrustPCA-G2.crt"),
    ("GeoTrust Primary Certification Authority - G3", "http://cacerts.geotrust.com/GeoTrustPCA-G3.crt"),
    ("GeoTrust Universal CA", "http://cacerts.geotrust.com/GeoTrustUniversalCA.crt"),
    // Let's Encrypt
    ("ISRG Root X1", "https://letsencrypt.org/certs/isrgrootx1.der"),
    ("ISRG Root X2", "https://letsencrypt.org/certs/isrg-root-x2.der"),
    // GlobalSign
    ("GlobalSign Root CA", "http://secure.globalsign.com/cacert/root-r1.crt"),
    ("GlobalSign Root CA - R2", "http://secure.globalsign.com/cacert/root-r2.crt"),
    ("GlobalSign Root CA - R3", "http://secure.globalsign.com/cacert/root-r3.crt"),
    ("GlobalSign Root CA - R6", "http://secure.globalsign.com/cacert/root-r6.crt"),
    ("GlobalSign ECC Root CA - R4", "http://secure.globalsign.com/cacert/root-r4.crt"),
    ("GlobalSign ECC Root CA - R5", "http://secure.globalsign.com/cacert/root-r5.crt"),
    // Sectigo (formerly Comodo)
    ("AAA Certificate Services", "http://crt.comodoca.com/AAAcertificateservices.crt"),
    ("USERTrust RSA Certification Authority", "http://crt.usertrust.com/USERTrustRSACertificationAuthority.crt"),
    ("USERTrust ECC Certification Authority", "http://crt.usertrust.com/USERTrustECCCertificationAuthority.crt"),
    ("Sectigo Public Server Authentication Root R46", "http://crt.sectigo.com/SectigoPublicServerAuthenticationRootR46.crt"),
    ("Sectigo Public Server Authentication Root E46", "http://crt.sectigo.com/SectigoPublicServerAuthenticationRootE46.crt"),
    // IdenTrust
    ("IdenTrust Commercial Root CA 1", "http://validation.identrust.com/roots/dstrootcax3.p7c"),
    ("IdenTrust Public Sector Root CA 1", "http://validation.identrust.com/roots/dstrootcax3.p7c"),
    ("DST Root CA X3", "https://letsencrypt.org/certs/trustid-x3-root.pem.txt"),
    // Entrust
    ("Entrust Root Certification Authority", "http://web.entrust.com/root-certificates/entrust_root_ca.cer"),
    ("Entrust Root Certification Authority - G2", "http://web.entrust.com/root-certificates/entrust_g2_ca.cer"),
    ("Entrust Root Certification Authority - G4", "http://web.entrust.com/root-certificates/entrust_g4_ca.cer"),
    ("Entrust.net Certification Authority (2048)", "http://web.entrust.com/root-certificates/entrust_2048_ca.cer"),
    // Baltimore CyberTrust (now DigiCert)
    ("Baltimore CyberTrust Root", "http://cacerts.digicert.com/BaltimoreCyberTrustRoot.crt"),
    // Amazon Trust Services
    ("Amazon Root CA 1", "https://www.amazontrust.com/repository/AmazonRootCA1.cer"),
    ("Amazon Root CA 2", "https://www.amazontrust.com/repository/AmazonRootCA2.cer"),
    ("Amazon Root CA 3", "https://www.amazontrust.com/repository/AmazonRootCA3.cer"),
    ("Amazon Root CA 4", "https://www.amazontrust.com/repository/AmazonRootCA4.cer"),
    ("Starfield Services Root Certificate Authority - G2", "https://www.amazontrust.com/repository/SFSRootCAG2.cer"),
    // Microsoft
    ("Microsoft RSA Root Certificate Authority 2017", "https://www.microsoft.com/pki/mscorp/cps/MicRooCerAut2011_2011_03_22.crt"),
    ("Microsoft ECC Root Certificate Authority 2017", "https://www.microsoft.com/pkiops/certs/MicRooCerAut2011_2011_03_22.crt"),
    // Google Trust Services
    ("GTS Root R1", "https://pki.goog/repo/certs/gtsr1.der"),
    ("GTS Root R2", "https://pki.goog/repo/certs/gtsr2.der"),
    ("GTS Root R3", "https://pki.goog/repo/certs/gtsr3.der"),
    ("GTS Root R4", "https://pki.goog/repo/certs/gtsr4.der"),
    // Certum
    ("Certum Trusted Network CA", "http://www.certum.pl/certum_trusted_network_ca.cer"),
    ("Certum Trusted Network CA 2", "http://www.certum.pl/certum_trusted_network_ca_2.cer"),
    // SwissSign
    ("SwissSign Gold CA - G2", "http://www.swisssign.com/download/SwissSign_Gold_CA_-_G2.crt"),
    ("SwissSign Silver CA - G2", "http://www.swisssign.com/download/SwissSign_Silver_CA_-_G2.crt"),
    // QuoVadis
    ("QuoVadis Root CA 2", "http://trust.quovadisglobal.com/qvrca2.crt"),
    ("QuoVadis Root CA 3", "http://trust.quovadisglobal.com/qvrca3.crt"),
    ("QuoVadis Root CA 2 G3", "http://trust.quovadisglobal.com/qvrca2g3.crt"),
    ("QuoVadis Root CA 3 G3", "http://trust.quovadisglobal.com/qvrca3g3.crt"),
];

/// Resolve an issuer CN to a root download URL: exact match first, then
/// substring containment in either direction.
#[must_use]
pub fn lookup(issuer_cn: &str) -> Option<&'static str> {
    if let Some((_, url)) = KNOWN_ROOT_URLS.iter().find(|(cn, _)| *cn == issuer_cn) {
        return Some(url);
    }
    KNOWN_ROOT_URLS
        .iter()
        .find(|(cn, _)| issuer_cn.contains(cn) || cn.contains(issuer_cn))
        .map(|(_, url)| *url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert_eq!(
            lookup("ISRG Root X1"),
            Some("https://letsencrypt.org/certs/isrgrootx1.der")
        );
    }

    #[test]
    fn partial_match_issuer_contains_table_entry() {
        assert_eq!(
            lookup("C=US ISRG Root X1 variant"),
            Some("https://letsencrypt.org/certs/isrgrootx1.der")
        );
    }

    #[test]
    fn partial_match_table_entry_contains_issuer() {
        // "GTS Root R" is a prefix of several entries; first wins
        assert_eq!(lookup("GTS Root R"), Some("https://pki.goog/repo/certs/gtsr1.der"));
    }

    #[test]
    fn exact_match_wins_over_partial() {
        // "DigiCert Global Root G2" is a substring of no earlier entry but a
        // superstring of none either; the exact entry must be chosen
        assert_eq!(
            lookup("DigiCert Global Root G2"),
            Some("http://cacerts.digicert.com/DigiCertGlobalRootG2.crt")
        );
    }

    #[test]
    fn unknown_cn_misses() {
        assert_eq!(lookup("Totally Private Corp Root CA"), None);
    }
}
