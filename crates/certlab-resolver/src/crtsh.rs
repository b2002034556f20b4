//! Certificate Transparency lookup against crt.sh.
//!
//! Used only as a diagnostic fallback: a successful lookup tells the caller
//! the certificate is known to CT logs, it never supplies certificate bytes.

use certlab_core::{CertLabError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://crt.sh";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One row of a crt.sh JSON answer; only the issuer id is interesting here.
#[derive(Debug, Deserialize)]
struct CrtShEntry {
    issuer_ca_id: i64,
}

/// Minimal crt.sh query client.
#[derive(Clone)]
pub struct CrtShClient {
    http: reqwest::Client,
    base_url: String,
}

impl CrtShClient {
    /// Client against the public crt.sh instance.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend fails to initialize.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL (used by tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Query CT logs by certificate SHA-256 fingerprint (colon-separated hex
    /// is accepted). Returns the issuer CA id of the first entry.
    ///
    /// # Errors
    ///
    /// `CtLogLookup` when the certificate is unknown (crt.sh answers with an
    /// HTML page or an empty result set) and `Network`/`Json` on transport
    /// or decode failures. All of these are expected to be folded into a
    /// diagnostic by the caller, never propagated to the end user.
    pub async fn lookup_by_fingerprint(&self, fingerprint: &str) -> Result<i64> {
        let query: String = fingerprint
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_uppercase();
        let url = format!("{}/?q={query}&output=json", self.base_url);
        debug!(url = %url, "crt.sh lookup");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CertLabError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let body = response.text().await.map_err(|e| CertLabError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        // crt.sh answers "not found" with an HTML page, not a JSON error
        if body.trim_start().starts_with('<') {
            return Err(CertLabError::CtLogLookup {
                reason: "certificate not found in CT logs".to_string(),
            });
        }

        let entries: Vec<CrtShEntry> =
            serde_json::from_str(&body).map_err(|e| CertLabError::Json(e.to_string()))?;
        entries.first().map(|e| e.issuer_ca_id).ok_or_else(|| {
            CertLabError::CtLogLookup {
                reason: "no results from crt.sh".to_string(),
            }
        })
    }
}

impl Default for CrtShClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Manual crt.sh search link for a certificate serial number, offered to the
/// caller when automatic chain building fails.
#[must_use]
pub fn manual_query_url(serial_number: &str) -> String {
    format!("{DEFAULT_BASE_URL}/?q={serial_number}")
}
