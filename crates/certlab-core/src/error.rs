use thiserror::Error;

/// Result type alias for certificate engine operations
pub type Result<T> = std::result::Result<T, CertLabError>;

/// Errors that can occur while inspecting certificates and chains
#[derive(Error, Debug)]
pub enum CertLabError {
    /// Input text was empty after trimming
    #[error("empty PEM input provided")]
    EmptyInput,

    /// Input contained no PEM certificate blocks
    #[error("no valid PEM certificate blocks found in input")]
    NoCertificatesFound,

    /// A DER buffer was empty where certificate bytes were expected
    #[error("empty or invalid DER data")]
    EmptyDer,

    /// PEM framing could not be decoded
    #[error("invalid PEM encoding: {0}")]
    InvalidPem(String),

    /// A single certificate block violated ASN.1/X.509 structure
    #[error("malformed certificate: {reason}")]
    MalformedCertificate {
        /// Decoder diagnostic for the failing block
        reason: String,
    },

    /// Every block in a multi-block chain failed to parse
    #[error("all certificate blocks failed to parse")]
    NoCertificatesParsed,

    /// Private key had neither a PKCS#8 nor a PKCS#1 PEM header
    #[error("invalid private key format: expected BEGIN PRIVATE KEY or BEGIN RSA PRIVATE KEY header")]
    UnsupportedKeyFormat,

    /// Private key block was present but could not be decoded
    #[error("failed to parse private key: {reason}")]
    KeyParseError {
        /// Decoder diagnostic (the key may be encrypted or corrupted)
        reason: String,
    },

    /// HTTP fetch failed (connection refused, timeout, non-success status)
    #[error("fetch from {url} failed: {reason}")]
    Network {
        /// URL that was being fetched
        url: String,
        /// Underlying transport error text
        reason: String,
    },

    /// Fetch returned an HTML error page instead of certificate bytes
    #[error("received HTML instead of certificate from {url}")]
    HtmlResponse {
        /// URL that was being fetched
        url: String,
    },

    /// Fetch returned a zero-length body
    #[error("empty response from {url}")]
    EmptyResponse {
        /// URL that was being fetched
        url: String,
    },

    /// Certificate Transparency lookup failed (diagnostic path only)
    #[error("CT log lookup failed: {reason}")]
    CtLogLookup {
        /// Why the lookup produced no usable answer
        reason: String,
    },

    /// Every chain-building fallback strategy was exhausted
    #[error("cannot build issuer chain automatically for {subject}: no AIA extension and issuer {issuer} is not a known root")]
    ChainUnresolvable {
        /// Subject common name of the certificate that could not be extended
        subject: String,
        /// Distinguished name of the unresolved issuer
        issuer: String,
        /// Suggested manual Certificate Transparency query
        crtsh_url: String,
        /// Whether the certificate itself was found in CT logs
        found_in_ct: bool,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(String),
}

impl CertLabError {
    /// Build a `MalformedCertificate` from any decoder error
    pub fn malformed(reason: impl ToString) -> Self {
        Self::MalformedCertificate {
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error came from network transport
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HtmlResponse { .. } | Self::EmptyResponse { .. }
        )
    }
}
