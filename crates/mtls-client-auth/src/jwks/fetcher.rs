//! Remote retrieval of JWKS documents.
//!
//! [`JwksProvider`] consults the [`JwksCache`] first and only calls the
//! [`JwksFetcher`] on a miss. Fetch failures are reported upward; nothing
//! here retries.

use super::cache::JwksCache;
use crate::errors::ClientAuthError;
use crate::observability::metrics::{record_jwks_cache_request, record_jwks_fetch};
use async_trait::async_trait;
use common::config::HttpTimeouts;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use url::Url;

/// Default upper bound on a fetched key-set document (50 KiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 51_200;

/// Retrieves the raw key-set document published at a URL.
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    /// Fetch the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientAuthError::RemoteFetch` if the endpoint is unreachable,
    /// times out, answers with a non-success status, or returns an
    /// oversized body.
    async fn fetch(&self, url: &Url) -> Result<String, ClientAuthError>;
}

/// HTTP fetcher bounded by connect and read timeouts.
#[derive(Debug, Clone)]
pub struct HttpJwksFetcher {
    http_client: reqwest::Client,
    max_response_bytes: usize,
}

impl HttpJwksFetcher {
    /// Create a fetcher with the given timeouts and response size limit.
    ///
    /// # Errors
    ///
    /// Returns `ClientAuthError::Configuration` if the HTTP client cannot
    /// be built.
    pub fn new(timeouts: HttpTimeouts, max_response_bytes: usize) -> Result<Self, ClientAuthError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect_timeout())
            .read_timeout(timeouts.read_timeout())
            .build()
            .map_err(|e| {
                tracing::error!(target: "mtls.jwks.fetch", error = %e, "Failed to build JWKS HTTP client");
                ClientAuthError::Configuration(format!("Failed to build JWKS HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            max_response_bytes,
        })
    }

    async fn fetch_body(&self, url: &Url) -> Result<String, ClientAuthError> {
        let mut response = self.http_client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!(target: "mtls.jwks.fetch", url = %url, error = %e, "Failed to fetch JWKS");
            ClientAuthError::RemoteFetch(format!("Failed to fetch JWKS from {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                target: "mtls.jwks.fetch",
                url = %url,
                status = %status,
                "JWKS endpoint returned error"
            );
            return Err(ClientAuthError::RemoteFetch(format!(
                "JWKS endpoint {} returned {}",
                url, status
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_response_bytes as u64 {
                return Err(self.oversized(url));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            tracing::error!(target: "mtls.jwks.fetch", url = %url, error = %e, "Failed to read JWKS response");
            ClientAuthError::RemoteFetch(format!("Failed to read JWKS from {}: {}", url, e))
        })? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(self.oversized(url));
            }
            body.extend_from_slice(&chunk);
        }

        String::from_utf8(body).map_err(|e| {
            tracing::error!(target: "mtls.jwks.fetch", url = %url, error = %e, "JWKS response is not UTF-8");
            ClientAuthError::RemoteFetch(format!("JWKS from {} is not valid UTF-8", url))
        })
    }

    fn oversized(&self, url: &Url) -> ClientAuthError {
        tracing::error!(
            target: "mtls.jwks.fetch",
            url = %url,
            limit = self.max_response_bytes,
            "JWKS response exceeds size limit"
        );
        ClientAuthError::RemoteFetch(format!(
            "JWKS from {} exceeds {} bytes",
            url, self.max_response_bytes
        ))
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String, ClientAuthError> {
        tracing::debug!(target: "mtls.jwks.fetch", url = %url, "Fetching JWKS");
        let start = Instant::now();

        let result = self.fetch_body(url).await;

        let status = if result.is_ok() { "success" } else { "error" };
        record_jwks_fetch(status, start.elapsed());

        if let Ok(body) = &result {
            tracing::info!(target: "mtls.jwks.fetch", url = %url, bytes = body.len(), "JWKS fetched");
        }
        result
    }
}

/// Cache-then-network access to key-set documents.
#[derive(Clone)]
pub struct JwksProvider {
    cache: JwksCache,
    fetcher: Arc<dyn JwksFetcher>,
}

impl JwksProvider {
    pub fn new(cache: JwksCache, fetcher: Arc<dyn JwksFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// The cache backing this provider.
    pub fn cache(&self) -> &JwksCache {
        &self.cache
    }

    /// Key-set document for `url`, fetched only on a cache miss.
    ///
    /// A successful fetch is cached before it is returned.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's `ClientAuthError::RemoteFetch`.
    pub async fn key_set(&self, url: &Url) -> Result<Arc<str>, ClientAuthError> {
        if let Some(content) = self.cache.get(url).await {
            tracing::debug!(target: "mtls.jwks.cache", url = %url, "JWKS cache hit");
            record_jwks_cache_request("hit");
            return Ok(content);
        }

        tracing::debug!(target: "mtls.jwks.cache", url = %url, "JWKS cache miss");
        record_jwks_cache_request("miss");

        let content: Arc<str> = Arc::from(self.fetcher.fetch(url).await?);
        self.cache.put(url, Arc::clone(&content)).await;
        Ok(content)
    }
}

impl std::fmt::Debug for JwksProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksProvider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Mock JWKS fetcher module for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock fetcher that serves a fixed document and counts calls.
    pub struct MockJwksFetcher {
        /// Document to return; `None` makes every fetch fail.
        body: Option<String>,
        /// Number of calls made.
        call_count: AtomicUsize,
    }

    impl MockJwksFetcher {
        /// Create a mock that always returns `body`.
        pub fn with_body(body: impl Into<String>) -> Self {
            Self {
                body: Some(body.into()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock whose fetches always fail.
        pub fn failing() -> Self {
            Self {
                body: None,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JwksFetcher for MockJwksFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, ClientAuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.body.clone().ok_or_else(|| {
                ClientAuthError::RemoteFetch(format!("Mock JWKS fetch of {} failed", url))
            })
        }
    }
}
