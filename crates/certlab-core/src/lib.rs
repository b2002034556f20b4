//! # certlab-core
//!
//! Certificate chain inspection engine: parse PEM/DER certificate material
//! into a structured model, compute fingerprints and HPKP pins, classify
//! chain roles, verify chains locally by name linkage, and match private
//! keys to certificates by public-modulus comparison.
//!
//! All operations here are synchronous, pure computations with no shared
//! state; they may run concurrently across independent inputs. Network I/O
//! (AIA chasing, CT-log lookups) lives in `certlab-resolver`.
//!
//! ## Data Flow
//!
//! ```text
//! raw text -> pem::extract_pem_blocks()        (PEM framing)
//!          -> parser::parse_certificate() each (X.509 model + fingerprints)
//!          -> verify::classify()               (Leaf / Intermediate / Root)
//!          -> verify::verify_chain()           (VerificationReport)
//! ```
//!
//! The local verifier checks validity windows and subject/issuer name
//! linkage only. It never verifies signatures, revocation, or trust anchors;
//! see [`verify`] for the exact semantics.

pub mod commands;
pub mod error;
pub mod fingerprint;
pub mod keymatch;
pub mod parser;
pub mod pem;
pub mod types;
pub mod verify;

pub use error::{CertLabError, Result};
pub use keymatch::KeyMatch;
pub use types::*;
