//! Decoding of certificates forwarded in a request header.
//!
//! Proxies forward the client certificate as base64 DER, PEM, or either of
//! those URL-encoded. Decoding tries standard base64 on the sanitised
//! content first and falls back to URL-decoding the raw value before a
//! second attempt. Nothing more lenient than that is attempted.

use super::ClientCertificate;
use crate::errors::ClientAuthError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

const BEGIN_CERT: &str = "-----BEGIN CERTIFICATE-----";
const END_CERT: &str = "-----END CERTIFICATE-----";

/// Standard alphabet; trailing `=` padding is optional.
const STANDARD_PAD_OPTIONAL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Strip PEM framing, whitespace and literal `\n` escapes.
pub fn sanitize_certificate(content: &str) -> String {
    let body = content
        .trim()
        .replace(BEGIN_CERT, "")
        .replace(END_CERT, "");
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replace("\\n", "")
}

/// Decode a raw certificate string into a certificate.
///
/// # Errors
///
/// Returns `ClientAuthError::CertificateDecode` if neither decoding
/// strategy yields base64, or if the bytes are not an X.509 certificate.
pub fn decode_certificate(content: &str) -> Result<ClientCertificate, ClientAuthError> {
    let der = decode_der(content)?;
    ClientCertificate::from_der(&der).map_err(|e| ClientAuthError::CertificateDecode(e.to_string()))
}

fn decode_der(content: &str) -> Result<Vec<u8>, ClientAuthError> {
    match STANDARD_PAD_OPTIONAL.decode(sanitize_certificate(content)) {
        Ok(der) => Ok(der),
        Err(e) => {
            debug!(
                target: "mtls.certificate",
                error = %e,
                "Base64 decoding of certificate failed, retrying after URL decoding"
            );
            let url_decoded = urlencoding::decode(content).map_err(|e| {
                ClientAuthError::CertificateDecode(format!("URL decoding failed: {}", e))
            })?;
            STANDARD_PAD_OPTIONAL
                .decode(sanitize_certificate(&url_decoded))
                .map_err(|e| {
                    ClientAuthError::CertificateDecode(format!("Base64 decoding failed: {}", e))
                })
        }
    }
}
