//! HTTP certificate fetcher used for AIA URLs and root-CA downloads.

use async_trait::async_trait;
use certlab_core::{CertLabError, Result};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default request timeout, matching the host TLS-probe behavior.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches certificate bytes from a URL. One blocking-or-awaited request,
/// bounded timeout, no retry; a failure is terminal for that step.
#[async_trait]
pub trait CertFetcher: Send + Sync {
    /// GET `url` and return the body as raw DER bytes.
    async fn fetch_der(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed [`CertFetcher`].
///
/// Rejects HTML responses (CA repositories serve error pages with 200) and
/// empty bodies rather than attempting to decode them as DER.
#[derive(Clone)]
pub struct HttpFetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    http: HttpClient,
}

impl HttpFetcher {
    /// Create a fetcher with default settings.
    #[must_use]
    pub fn new() -> Self {
        HttpFetcherBuilder::default().build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertFetcher for HttpFetcher {
    async fn fetch_der(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET certificate");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CertLabError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CertLabError::Network {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.contains("text/html") {
            return Err(CertLabError::HtmlResponse {
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CertLabError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if bytes.is_empty() {
            return Err(CertLabError::EmptyResponse {
                url: url.to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

/// Builder for configuring an [`HttpFetcher`].
pub struct HttpFetcherBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("certlab/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpFetcherBuilder {
    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the fetcher.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend fails to initialize.
    #[must_use]
    pub fn build(self) -> HttpFetcher {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .expect("failed to build HTTP client");

        HttpFetcher {
            inner: Arc::new(FetcherInner { http }),
        }
    }
}
