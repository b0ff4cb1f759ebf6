//! Observability for mTLS client authentication.
//!
//! # Privacy by Default
//!
//! Entry points use `#[instrument(skip_all)]` and record only explicitly
//! allow-listed fields:
//! - **SAFE**: outcomes, error codes, certificate thumbprints, JWKS URLs
//! - **HASHED**: `client_id` (see [`hash_for_correlation`])
//! - **NEVER**: raw certificate content, request bodies

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Used for `client_id`, which must be correlatable across log entries
/// without appearing in plaintext. Not a secret-protection mechanism.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}
