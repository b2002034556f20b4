//! Build the full issuer chain for a bare leaf certificate by walking AIA
//! CA-Issuers URLs.
//!
//! Run with: cargo run --example resolve_chain -- leaf.pem

use certlab_core::Result;
use certlab_resolver::{ChainResolver, Completeness, HttpFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .expect("usage: resolve_chain <leaf.pem>");
    let leaf = std::fs::read_to_string(&path).expect("failed to read leaf file");

    let resolver = ChainResolver::new(HttpFetcher::new());
    let resolved = resolver.resolve(&leaf).await?;

    println!("Resolved {} certificate(s)", resolved.certificate_count);
    match &resolved.completeness {
        Completeness::Complete => println!("Chain is complete (ends at a self-signed root)"),
        Completeness::Truncated(reason) => println!("Chain is partial: {reason:?}"),
    }
    println!();
    println!("{}", resolved.full_chain_pem);

    Ok(())
}
