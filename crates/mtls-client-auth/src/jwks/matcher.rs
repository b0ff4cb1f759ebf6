//! Matching a presented certificate against a JWKS document.
//!
//! Entries are examined in array order and the first match wins. Each
//! entry is only deserialized when reached, so a malformed entry after a
//! match is never looked at. A malformed entry before any match fails the
//! whole attempt.

use crate::certificate::thumbprint::{self, X5T_S256};
use crate::certificate::ClientCertificate;
use crate::errors::ClientAuthError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// The two JWK members used for matching. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct JwkEntry {
    #[serde(rename = "x5t#S256", default)]
    thumbprint: Option<String>,
    #[serde(default)]
    x5c: Option<CertificateChain>,
}

/// `x5c` is normally an array (leaf first); a bare string is accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CertificateChain {
    Chain(Vec<String>),
    Single(String),
}

impl CertificateChain {
    fn leaf(&self) -> Option<&str> {
        match self {
            CertificateChain::Chain(chain) => chain.first().map(String::as_str),
            CertificateChain::Single(cert) => Some(cert.as_str()),
        }
    }
}

/// Whether any key in `raw_key_set` matches `presented`.
///
/// A key matches when its `x5t#S256` equals the presented thumbprint, or
/// when the leaf of its `x5c` chain matches under
/// [`thumbprint::matches`], including the subject DN pin.
///
/// A document without a `keys` member matches nothing.
///
/// # Errors
///
/// Returns `ClientAuthError::MalformedKeySet` if the document is not a JSON
/// object, `keys` is not an array, or an examined entry is not a JWK
/// object or embeds an undecodable certificate.
pub fn find_match(
    raw_key_set: &str,
    presented: &ClientCertificate,
    pinned_subject_dn: Option<&str>,
) -> Result<bool, ClientAuthError> {
    let document: Value = serde_json::from_str(raw_key_set).map_err(|e| {
        debug!(target: "mtls.jwks.matcher", error = %e, "JWKS document is not valid JSON");
        ClientAuthError::MalformedKeySet(format!("JWKS is not valid JSON: {}", e))
    })?;

    let object = document.as_object().ok_or_else(|| {
        ClientAuthError::MalformedKeySet("JWKS is not a JSON object".to_string())
    })?;

    let Some(keys) = object.get("keys") else {
        debug!(target: "mtls.jwks.matcher", "JWKS has no keys member, no match");
        return Ok(false);
    };

    let keys = keys
        .as_array()
        .ok_or_else(|| ClientAuthError::MalformedKeySet("JWKS keys is not an array".to_string()))?;

    let presented_thumbprint = presented.thumbprint();

    for (index, key) in keys.iter().enumerate() {
        let entry = JwkEntry::deserialize(key).map_err(|e| {
            ClientAuthError::MalformedKeySet(format!("JWKS key {} is malformed: {}", index, e))
        })?;

        if let Some(key_thumbprint) = entry.thumbprint.as_deref() {
            if presented_thumbprint == *key_thumbprint {
                debug!(
                    target: "mtls.jwks.matcher",
                    index,
                    attribute = X5T_S256,
                    "Presented certificate matched JWKS key"
                );
                return Ok(true);
            }
        }

        if let Some(chain) = &entry.x5c {
            let embedded = decode_embedded(chain, index)?;
            if thumbprint::matches(&embedded, presented, pinned_subject_dn) {
                debug!(
                    target: "mtls.jwks.matcher",
                    index,
                    attribute = "x5c",
                    "Presented certificate matched JWKS key"
                );
                return Ok(true);
            }
        }
    }

    debug!(
        target: "mtls.jwks.matcher",
        key_count = keys.len(),
        thumbprint = %presented_thumbprint,
        "No JWKS key matched the presented certificate"
    );
    Ok(false)
}

fn decode_embedded(chain: &CertificateChain, index: usize) -> Result<ClientCertificate, ClientAuthError> {
    let encoded = chain.leaf().ok_or_else(|| {
        ClientAuthError::MalformedKeySet(format!("JWKS key {} has an empty x5c", index))
    })?;

    let der = STANDARD.decode(encoded.trim()).map_err(|e| {
        ClientAuthError::MalformedKeySet(format!("JWKS key {} x5c is not base64: {}", index, e))
    })?;

    ClientCertificate::from_der(&der).map_err(|e| {
        ClientAuthError::MalformedKeySet(format!("JWKS key {} x5c is not a certificate: {}", index, e))
    })
}
