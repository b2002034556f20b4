//! Issuer-chain resolution from a bare leaf certificate.
//!
//! Walks AIA CA-Issuers URLs with layered fallbacks, evaluated in order:
//! AIA fetch, then the known-root URL table by issuer CN, then (for a leaf
//! with no AIA at all) a CT-log lookup that only enriches the failure
//! diagnostic. Bounded by [`MAX_DEPTH`]; beyond self-signature detection
//! there is no cycle detection, so a looping AIA reference simply exhausts
//! the depth budget and returns the accumulated partial chain.

use certlab_core::parser::parse_certificate;
use certlab_core::pem::{der_to_pem, extract_pem_blocks};
use certlab_core::{Certificate, CertLabError, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::crtsh::{manual_query_url, CrtShClient};
use crate::fetch::CertFetcher;
use crate::known_roots;

/// Hard bound on issuer fetches for one resolution attempt.
pub const MAX_DEPTH: usize = 10;

/// Why a resolved chain stopped short of a self-signed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TruncationReason {
    /// The iteration bound was hit (possible AIA loop)
    MaxDepthReached,
    /// A fetch or parse failed mid-walk; the chain up to that point is kept
    FetchFailed(String),
}

/// Whether the chain reached a self-signed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Completeness {
    /// Chain ends in a self-signed root
    Complete,
    /// Chain is partial; the reason says why the walk stopped
    Truncated(TruncationReason),
}

/// Output of a successful (possibly partial) resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedChain {
    /// Number of PEM blocks in the chain
    pub certificate_count: usize,
    /// All blocks joined with a newline, ready for re-parsing
    pub full_chain_pem: String,
    /// Individual PEM blocks, leaf first, in resolution order
    pub certificates: Vec<String>,
    /// Whether a self-signed root was reached
    pub completeness: Completeness,
}

impl ResolvedChain {
    fn new(certificates: Vec<String>, completeness: Completeness) -> Self {
        Self {
            certificate_count: certificates.len(),
            full_chain_pem: certificates.join("\n"),
            certificates,
            completeness,
        }
    }
}

/// Chain resolver over a pluggable certificate fetcher.
///
/// Concurrent resolutions are fully independent; the resolver holds no
/// mutable state between calls.
pub struct ChainResolver<F> {
    fetcher: F,
    crtsh: CrtShClient,
}

impl<F: CertFetcher> ChainResolver<F> {
    /// Resolver using the public crt.sh instance for diagnostics.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            crtsh: CrtShClient::new(),
        }
    }

    /// Resolver with a custom CT-log client (used by tests).
    #[must_use]
    pub fn with_crtsh(fetcher: F, crtsh: CrtShClient) -> Self {
        Self { fetcher, crtsh }
    }

    /// Build the issuer chain for a bare leaf certificate.
    ///
    /// The returned chain is PEM text that must be re-parsed through the
    /// core pipeline; in-memory certificates are not reused.
    ///
    /// # Errors
    ///
    /// `ChainUnresolvable` when every fallback strategy is exhausted before
    /// any issuer could be located, plus leaf parse errors. Fetch failures
    /// during the walk do NOT error: the partial chain is returned with a
    /// [`TruncationReason`].
    pub async fn resolve(&self, leaf_pem: &str) -> Result<ResolvedChain> {
        let blocks = extract_pem_blocks(leaf_pem)?;
        let leaf = parse_certificate(&blocks[0])?;

        let mut chain = vec![blocks[0].clone()];
        let mut current = leaf;
        let mut depth = 0usize;

        loop {
            if current.is_self_signed {
                debug!(
                    count = chain.len(),
                    "reached self-signed root, chain complete"
                );
                return Ok(ResolvedChain::new(chain, Completeness::Complete));
            }
            if depth >= MAX_DEPTH {
                warn!(max_depth = MAX_DEPTH, "max depth reached, stopping chain walk");
                return Ok(ResolvedChain::new(
                    chain,
                    Completeness::Truncated(TruncationReason::MaxDepthReached),
                ));
            }

            if let Some(url) = current.authority_info_access_url.clone() {
                match self.fetch_and_parse(&url).await {
                    Ok((pem, cert)) => {
                        debug!(url = %url, count = chain.len() + 1, "appended issuer certificate");
                        chain.push(pem);
                        current = cert;
                        depth += 1;
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, depth, "issuer fetch failed, stopping chain walk");
                        return Ok(ResolvedChain::new(
                            chain,
                            Completeness::Truncated(TruncationReason::FetchFailed(e.to_string())),
                        ));
                    }
                }
                continue;
            }

            // No CA-Issuers URL: try the static root table by issuer CN.
            let issuer_cn = current.issuer.common_name();
            if let Some(root_url) = issuer_cn.and_then(known_roots::lookup) {
                debug!(url = root_url, "issuer CN matched known root table");
                match self.fetch_and_parse(root_url).await {
                    Ok((pem, _)) => {
                        chain.push(pem);
                        return Ok(ResolvedChain::new(chain, Completeness::Complete));
                    }
                    Err(e) => {
                        warn!(url = root_url, error = %e, "known root fetch failed");
                        return Ok(ResolvedChain::new(
                            chain,
                            Completeness::Truncated(TruncationReason::FetchFailed(e.to_string())),
                        ));
                    }
                }
            }

            // All strategies exhausted. For a bare leaf, first ask CT logs,
            // purely to enrich the diagnostic; a lookup failure is folded
            // into the answer, never propagated.
            let found_in_ct = if depth == 0 {
                match self
                    .crtsh
                    .lookup_by_fingerprint(&current.fingerprint_sha256)
                    .await
                {
                    Ok(issuer_ca_id) => {
                        debug!(issuer_ca_id, "certificate known to CT logs");
                        true
                    }
                    Err(e) => {
                        debug!(error = %e, "CT log fallback failed");
                        false
                    }
                }
            } else {
                false
            };

            return Err(CertLabError::ChainUnresolvable {
                subject: current.subject.common_name_or_unknown().to_string(),
                issuer: current.issuer.display_name(),
                crtsh_url: manual_query_url(&current.serial_number),
                found_in_ct,
            });
        }
    }

    /// Fetch DER bytes, convert to PEM, and parse the result.
    async fn fetch_and_parse(&self, url: &str) -> Result<(String, Certificate)> {
        let der = self.fetcher.fetch_der(url).await?;
        let pem = der_to_pem(&der)?;
        let cert = parse_certificate(&pem)?;
        Ok((pem, cert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certlab_core::parser::parse_chain;
    use certlab_core::verify::{classify, verify_chain};
    use certlab_core::Role;
    use rcgen::{
        CertificateParams, CustomExtension, DistinguishedName, DnType, IsCa, KeyPair,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dn(cn: &str) -> DistinguishedName {
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        dn
    }

    /// DER AuthorityInfoAccess body with a single CA-issuers URI.
    fn aia_content(url: &str) -> Vec<u8> {
        const METHOD: &[u8] = &[0x06, 0x08, 0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
        assert!(url.len() < 120);
        let mut location = vec![0x86, u8::try_from(url.len()).unwrap()];
        location.extend_from_slice(url.as_bytes());
        let mut desc = vec![0x30, u8::try_from(METHOD.len() + location.len()).unwrap()];
        desc.extend_from_slice(METHOD);
        desc.extend_from_slice(&location);
        let mut out = vec![0x30, u8::try_from(desc.len()).unwrap()];
        out.extend_from_slice(&desc);
        out
    }

    struct TestCa {
        cert: rcgen::Certificate,
        key: KeyPair,
    }

    fn make_root(cn: &str) -> TestCa {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::default();
        params.distinguished_name = dn(cn);
        params.is_ca = IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
        let cert = params.self_signed(&key).unwrap();
        TestCa { cert, key }
    }

    /// Leaf signed by `issuer`, optionally carrying an AIA URL.
    fn make_leaf(cn: &str, issuer: &TestCa, aia_url: Option<&str>) -> String {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
        params.distinguished_name = dn(cn);
        params.is_ca = IsCa::NoCa;
        if let Some(url) = aia_url {
            params
                .custom_extensions
                .push(CustomExtension::from_oid_content(
                    &[1, 3, 6, 1, 5, 5, 7, 1, 1],
                    aia_content(url),
                ));
        }
        params
            .signed_by(&key, &issuer.cert, &issuer.key)
            .unwrap()
            .pem()
    }

    fn resolver_for(server: &MockServer, fetcher: crate::fetch::HttpFetcher) -> ChainResolver<crate::fetch::HttpFetcher> {
        // point crt.sh at the mock server so tests never hit the network
        ChainResolver::with_crtsh(fetcher, CrtShClient::with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn aia_pointing_at_self_signed_root_completes_in_one_fetch() {
        let server = MockServer::start().await;
        let root = make_root("Fetch Root CA");
        let root_der = certlab_core::pem::pem_to_der(&root.cert.pem()).unwrap();

        Mock::given(method("GET"))
            .and(path("/root.crt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(root_der)
                    .insert_header("content-type", "application/pkix-cert"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let leaf = make_leaf(
            "leaf.example.com",
            &root,
            Some(&format!("{}/root.crt", server.uri())),
        );

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let resolved = resolver.resolve(&leaf).await.unwrap();

        assert_eq!(resolved.certificate_count, 2);
        assert_eq!(resolved.completeness, Completeness::Complete);

        // The produced PEM feeds back through the normal pipeline
        let chain = parse_chain(&resolved.full_chain_pem).unwrap();
        assert_eq!(classify(&chain), vec![Role::Leaf, Role::Root]);
        assert!(verify_chain(&chain).valid);
    }

    #[tokio::test]
    async fn self_signed_leaf_terminates_without_fetching() {
        let server = MockServer::start().await;
        let root = make_root("Standalone Root");

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let resolved = resolver.resolve(&root.cert.pem()).await.unwrap();

        assert_eq!(resolved.certificate_count, 1);
        assert_eq!(resolved.completeness, Completeness::Complete);
        // no mocks mounted: any request would have panicked the mock server
    }

    #[tokio::test]
    async fn aia_loop_stops_at_max_depth_with_partial_chain() {
        let server = MockServer::start().await;
        let root = make_root("Loop CA");
        // certificate that is not self-signed and points its AIA at itself
        let loop_url = format!("{}/loop.crt", server.uri());
        let loop_pem = make_leaf("loop.example.com", &root, Some(&loop_url));
        let loop_der = certlab_core::pem::pem_to_der(
            &certlab_core::pem::extract_pem_blocks(&loop_pem).unwrap()[0],
        )
        .unwrap();

        Mock::given(method("GET"))
            .and(path("/loop.crt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(loop_der)
                    .insert_header("content-type", "application/pkix-cert"),
            )
            .expect(MAX_DEPTH as u64)
            .mount(&server)
            .await;

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let resolved = resolver.resolve(&loop_pem).await.unwrap();

        assert_eq!(
            resolved.completeness,
            Completeness::Truncated(TruncationReason::MaxDepthReached)
        );
        assert_eq!(resolved.certificate_count, MAX_DEPTH + 1);
    }

    #[tokio::test]
    async fn fetch_error_returns_partial_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.crt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let root = make_root("Unreachable CA");
        let leaf = make_leaf(
            "leaf.example.com",
            &root,
            Some(&format!("{}/gone.crt", server.uri())),
        );

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let resolved = resolver.resolve(&leaf).await.unwrap();

        assert_eq!(resolved.certificate_count, 1);
        assert!(matches!(
            resolved.completeness,
            Completeness::Truncated(TruncationReason::FetchFailed(_))
        ));
    }

    #[tokio::test]
    async fn aia_less_leaf_with_unknown_issuer_is_unresolvable() {
        let server = MockServer::start().await;
        // crt.sh mock answers with an HTML page: certificate unknown to CT
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let root = make_root("Totally Private Corp Root CA");
        let leaf = make_leaf("internal.example.com", &root, None);

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let err = resolver.resolve(&leaf).await.unwrap_err();

        match err {
            CertLabError::ChainUnresolvable {
                subject,
                issuer,
                crtsh_url,
                found_in_ct,
            } => {
                assert_eq!(subject, "internal.example.com");
                assert!(issuer.contains("Totally Private Corp Root CA"));
                assert!(crtsh_url.starts_with("https://crt.sh/?q="));
                // the serial is embedded in the manual query link
                let serial = crtsh_url.rsplit('=').next().unwrap();
                assert!(!serial.is_empty());
                assert!(!found_in_ct);
            }
            other => panic!("expected ChainUnresolvable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ct_hit_still_yields_unresolvable_but_flags_ct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"[{"issuer_ca_id": 42}]"#),
            )
            .mount(&server)
            .await;

        let root = make_root("Obscure Issuer CA");
        let leaf = make_leaf("ct-known.example.com", &root, None);

        let resolver = resolver_for(&server, crate::fetch::HttpFetcher::new());
        let err = resolver.resolve(&leaf).await.unwrap_err();
        assert!(matches!(
            err,
            CertLabError::ChainUnresolvable { found_in_ct: true, .. }
        ));
    }

    #[tokio::test]
    async fn known_root_table_supplies_final_certificate() {
        // Fetcher stub: serves a fixed self-signed root for any URL, so the
        // known-root URL never leaves the test.
        struct StubFetcher {
            der: Vec<u8>,
        }

        #[async_trait::async_trait]
        impl CertFetcher for StubFetcher {
            async fn fetch_der(&self, _url: &str) -> certlab_core::Result<Vec<u8>> {
                Ok(self.der.clone())
            }
        }

        let server = MockServer::start().await;
        let table_root = make_root("ISRG Root X1");
        let der = certlab_core::pem::pem_to_der(&table_root.cert.pem()).unwrap();
        let leaf = make_leaf("le.example.com", &table_root, None);

        let resolver = ChainResolver::with_crtsh(
            StubFetcher { der },
            CrtShClient::with_base_url(server.uri()),
        );
        let resolved = resolver.resolve(&leaf).await.unwrap();

        assert_eq!(resolved.certificate_count, 2);
        assert_eq!(resolved.completeness, Completeness::Complete);
        let chain = parse_chain(&resolved.full_chain_pem).unwrap();
        assert!(verify_chain(&chain).valid);
    }
}
