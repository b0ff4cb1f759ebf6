//! Certificate thumbprints and trust comparison.
//!
//! A thumbprint is the base64url (unpadded) SHA-256 digest of the DER
//! encoding, the same value a JWK carries in `x5t#S256` (RFC 7517 §4.9,
//! RFC 8705 §3.1). Two certificates are trust-equivalent when their
//! thumbprints are equal; a pinned subject DN narrows that further.

use super::ClientCertificate;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// JWK member carrying the SHA-256 certificate thumbprint.
pub const X5T_S256: &str = "x5t#S256";

/// SHA-256 certificate thumbprint in `x5t#S256` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thumbprint(String);

impl Thumbprint {
    pub fn of(cert: &ClientCertificate) -> Self {
        let digest = Sha256::digest(cert.der());
        Self(URL_SAFE_NO_PAD.encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Thumbprint {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Whether `presented` is trusted as `registered`.
///
/// Thumbprints must be equal. When `pinned_subject_dn` is non-empty the
/// presented certificate's subject DN must also equal it exactly; a DN
/// mismatch overrides a thumbprint match.
pub fn matches(
    registered: &ClientCertificate,
    presented: &ClientCertificate,
    pinned_subject_dn: Option<&str>,
) -> bool {
    let registered_thumbprint = registered.thumbprint();
    let presented_thumbprint = presented.thumbprint();

    if registered_thumbprint != presented_thumbprint {
        debug!(
            target: "mtls.certificate",
            presented = %presented_thumbprint,
            registered = %registered_thumbprint,
            "Client certificate thumbprint did not match the registered certificate"
        );
        return false;
    }

    debug!(
        target: "mtls.certificate",
        thumbprint = %presented_thumbprint,
        "Client certificate thumbprint matched the registered certificate"
    );

    match pinned_subject_dn.filter(|dn| !dn.is_empty()) {
        Some(pinned) if pinned != presented.subject_dn() => {
            debug!(
                target: "mtls.certificate",
                presented_subject = %presented.subject_dn(),
                pinned_subject = %pinned,
                "Client certificate subject DN does not match the pinned subject DN"
            );
            false
        }
        _ => true,
    }
}
