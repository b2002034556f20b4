//! Data model for parsed certificates, chains and verification reports.

mod certificate;
mod report;

pub use certificate::{BasicConstraints, Certificate, NameAttributes, PublicKeyInfo, Role};
pub use report::{CheckEvent, VerificationReport};
