//! Integration tests for certificate decoding and matching
//!
//! Exercise the decoder on every encoding a proxy may forward, and the
//! thumbprint/pin comparison on decoded certificates.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mtls_client_auth::certificate::{self, decode_certificate, ClientCertificate};
use mtls_test_utils::*;

// ============================================================================
// Decoding
// ============================================================================

/// Decoding the base64 DER of a certificate yields the same certificate.
#[test]
fn test_decode_base64_round_trip() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);

    let decoded = decode_certificate(&cert.base64()).unwrap();

    assert_eq!(decoded.der(), cert.der());
    assert_eq!(decoded, cert.parsed());
}

/// PEM framing and line breaks do not change the decoded certificate.
#[test]
fn test_decode_pem_equals_base64() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);

    let from_pem = decode_certificate(cert.pem()).unwrap();
    let from_base64 = decode_certificate(&cert.base64()).unwrap();

    assert_eq!(from_pem, from_base64);
    assert_eq!(from_pem.thumbprint(), from_base64.thumbprint());
}

/// A URL-encoded PEM is decoded through the fallback path.
#[test]
fn test_decode_url_encoded_pem() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let encoded = cert.url_encoded_pem();
    assert!(encoded.contains('%'), "fixture should contain escapes");

    let decoded = decode_certificate(&encoded).unwrap();

    assert_eq!(decoded.der(), cert.der());
}

/// A literal `\n` escape sequence in the forwarded value is ignored.
#[test]
fn test_decode_escaped_newlines() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let escaped = cert.pem().replace('\n', "\\n");

    let decoded = decode_certificate(&escaped).unwrap();

    assert_eq!(decoded.der(), cert.der());
}

#[test]
fn test_decode_garbage_fails() {
    let result = decode_certificate("not a certificate at all");
    assert!(result.is_err());
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_certificate_matches_itself() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN).parsed();
    assert!(certificate::matches(&cert, &cert, None));
}

#[test]
fn test_different_certificates_do_not_match() {
    let registered = TestCertificate::generate(TEST_SUBJECT_CN).parsed();
    let presented = TestCertificate::generate(TEST_SUBJECT_CN).parsed();

    // Same subject, different keys
    assert!(!certificate::matches(&registered, &presented, None));
}

/// A pinned subject DN overrides an otherwise identical certificate.
#[test]
fn test_pin_overrides_thumbprint_match() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let parsed = cert.parsed();

    assert!(certificate::matches(&parsed, &parsed, Some(&cert.subject_dn())));
    assert!(!certificate::matches(&parsed, &parsed, Some("CN=someone-else")));
}

#[test]
fn test_subject_dn_includes_organization() {
    let cert = TestCertificate::generate_with_org(TEST_SUBJECT_CN, Some("Example Corp"));
    let parsed = ClientCertificate::from_der(cert.der()).unwrap();

    assert_eq!(parsed.subject_dn(), "CN=payments-api, O=Example Corp");
}
