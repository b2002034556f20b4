//! # certlab-resolver
//!
//! The I/O half of certlab: fetches issuer certificates over HTTP, walks AIA
//! CA-Issuers chains, consults crt.sh and a static root-CA URL table as
//! fallbacks, and adapts live TLS-probe output into the core parse pipeline.
//!
//! All parsing and verification semantics live in `certlab-core`; this crate
//! only moves bytes and sequences the fallback strategies.
//!
//! ## Resolution strategy
//!
//! ```text
//! leaf PEM -> [self-signed? done]
//!          -> AIA CA-Issuers URL   (fetch::HttpFetcher)
//!          -> known root URL table (known_roots, by issuer CN)
//!          -> crt.sh diagnostic    (crtsh, enriches the failure only)
//! ```

pub mod crtsh;
pub mod fetch;
pub mod known_roots;
pub mod probe;
pub mod resolver;

pub use crtsh::CrtShClient;
pub use fetch::{CertFetcher, HttpFetcher, HttpFetcherBuilder};
pub use probe::{chain_from_probe, DomainReport, PeerCertificate, ProbedChain, TlsProbe};
pub use resolver::{ChainResolver, Completeness, ResolvedChain, TruncationReason, MAX_DEPTH};
