//! Process-wide JWKS resource cache.
//!
//! Maps a normalized JWKS endpoint URL to the raw key-set document last
//! fetched from it. Entries never expire unless a TTL is configured;
//! `invalidate` and `clear` are the external invalidation hooks.
//!
//! Concurrent misses for the same URL may each fetch and `put`; the last
//! writer wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// Cached key-set document with fetch metadata.
#[derive(Debug, Clone)]
struct CachedKeySet {
    content: Arc<str>,
    fetched_at: Instant,
}

/// Keyed JWKS cache, safe for concurrent use.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct JwksCache {
    entries: Arc<RwLock<HashMap<String, CachedKeySet>>>,
    ttl: Option<Duration>,
}

impl JwksCache {
    /// Create a cache whose entries live for the process lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries are treated as missing once older
    /// than `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Some(ttl),
        }
    }

    /// Cached key-set document for `url`, if present and fresh.
    pub async fn get(&self, url: &Url) -> Option<Arc<str>> {
        let entries = self.entries.read().await;
        let cached = entries.get(url.as_str())?;

        if let Some(ttl) = self.ttl {
            if cached.fetched_at.elapsed() >= ttl {
                debug!(target: "mtls.jwks.cache", url = %url, "JWKS cache entry expired");
                return None;
            }
        }

        Some(Arc::clone(&cached.content))
    }

    /// Store the key-set document fetched from `url`, replacing any
    /// previous entry.
    pub async fn put(&self, url: &Url, content: Arc<str>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            url.as_str().to_string(),
            CachedKeySet {
                content,
                fetched_at: Instant::now(),
            },
        );
        debug!(target: "mtls.jwks.cache", url = %url, entries = entries.len(), "JWKS cache updated");
    }

    /// Drop the entry for `url`. Returns whether one was present.
    pub async fn invalidate(&self, url: &Url) -> bool {
        self.entries.write().await.remove(url.as_str()).is_some()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of entries, including expired ones not yet replaced.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
