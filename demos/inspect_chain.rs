//! Parse, classify and locally verify a PEM chain from a file.
//!
//! Run with: cargo run --example inspect_chain -- chain.pem

use certlab_core::parser::parse_chain;
use certlab_core::verify::{classify, verify_chain};
use certlab_core::Result;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .expect("usage: inspect_chain <chain.pem>");
    let text = std::fs::read_to_string(&path).expect("failed to read chain file");

    let chain = parse_chain(&text)?;
    let roles = classify(&chain);

    println!("=== Certificates ===");
    for (cert, role) in chain.iter().zip(&roles) {
        println!("[{role}] {}", cert.subject.display_name());
        println!("  Issuer:      {}", cert.issuer.display_name());
        println!("  Serial:      {}", cert.serial_number);
        println!("  Valid until: {} ({} days)", cert.not_after, cert.days_until_expiry());
        println!("  SHA-256:     {}", cert.fingerprint_sha256);
        println!("  SPKI pin:    {}", cert.spki_pin_sha256);
        if !cert.subject_alt_names.is_empty() {
            println!("  SANs:        {}", cert.subject_alt_names.join(", "));
        }
        println!();
    }

    println!("=== Verification ===");
    let report = verify_chain(&chain);
    for line in report.lines() {
        println!("{line}");
    }
    println!();
    println!("Chain valid: {}", report.valid);

    Ok(())
}
