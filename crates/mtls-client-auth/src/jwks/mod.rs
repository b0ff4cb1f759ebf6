//! JWKS-backed client certificate trust.
//!
//! # Components
//!
//! - `cache` - process-wide cache of fetched key-set documents, keyed by URL
//! - `fetcher` - remote retrieval and the cache-then-network provider
//! - `matcher` - matching a presented certificate against a key set

pub mod cache;
pub mod fetcher;
pub mod matcher;

pub use cache::JwksCache;
pub use fetcher::{HttpJwksFetcher, JwksFetcher, JwksProvider, DEFAULT_MAX_RESPONSE_BYTES};
pub use matcher::find_match;
