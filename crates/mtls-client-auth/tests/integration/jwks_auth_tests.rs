//! Integration tests for clients registered with a JWKS endpoint
//!
//! These run the real HTTP fetcher against a wiremock JWKS server, so the
//! cache, fetcher and key-set matcher are exercised together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::HeaderMap;
use mtls_client_auth::authenticator::{
    BodyParams, ClientAuthContext, ClientAuthRequest, ClientAuthenticator, MutualTlsAuthenticator,
    MutualTlsConfig,
};
use mtls_client_auth::registry::RegisteredClientCredential;
use mtls_test_utils::*;
use serde_json::json;
use std::sync::Arc;
use url::Url;

fn body(client_id: &str) -> BodyParams {
    let mut body = BodyParams::new();
    body.insert("client_id".to_string(), vec![client_id.to_string()]);
    body
}

fn authenticator(registry: MockClientRegistry) -> MutualTlsAuthenticator {
    MutualTlsAuthenticator::from_config(&MutualTlsConfig::default(), Arc::new(registry)).unwrap()
}

async fn authenticate(
    auth: &MutualTlsAuthenticator,
    cert: &TestCertificate,
) -> Result<bool, mtls_client_auth::errors::ClientAuthError> {
    let request = ClientAuthRequest::new(HeaderMap::new()).with_certificate(cert.as_attribute());
    let mut context = ClientAuthContext::new();
    auth.authenticate_client(&request, &body(TEST_CLIENT_ID_JWKS), &mut context)
        .await
}

/// Certificate published as a one-element x5c chain authenticates.
#[tokio::test]
async fn test_x5c_certificate_authenticates() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.unwrap());
}

#[tokio::test]
async fn test_x5t_thumbprint_authenticates() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5t(&cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.unwrap());
}

/// The key set is fetched once and served from the cache afterwards.
#[tokio::test]
async fn test_key_set_is_fetched_once() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.unwrap());
    assert!(authenticate(&auth, &cert).await.unwrap());
    assert!(authenticate(&auth, &cert).await.unwrap());

    assert_eq!(jwks.received_count().await, 1);
    let url = Url::parse(&jwks.url()).unwrap();
    assert!(auth.jwks().cache().get(&url).await.is_some());
}

/// Invalidating the cache entry forces the next authentication to refetch.
#[tokio::test]
async fn test_invalidated_key_set_is_refetched() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 2)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));
    let url = Url::parse(&jwks.url()).unwrap();

    assert!(authenticate(&auth, &cert).await.unwrap());
    assert!(auth.jwks().cache().invalidate(&url).await);
    assert!(authenticate(&auth, &cert).await.unwrap());

    assert_eq!(jwks.received_count().await, 2);
}

/// A matching thumbprint ends the scan before a malformed later entry is
/// looked at.
#[tokio::test]
async fn test_match_short_circuits_before_malformed_entry() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let body = KeySetBuilder::new()
        .with_x5t(&cert)
        .with_raw_key(json!({ "kty": "RSA", "x5c": ["!!! not base64 !!!"] }))
        .build();
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&body, 1).await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.unwrap());
}

/// A key whose thumbprint belongs to another certificate still matches on
/// its x5c.
#[tokio::test]
async fn test_x5c_checked_when_thumbprint_differs() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let other = TestCertificate::generate(TEST_OTHER_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5t_and_x5c(&other, &cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.unwrap());
}

#[tokio::test]
async fn test_no_matching_key_rejects() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let other = TestCertificate::generate(TEST_OTHER_SUBJECT_CN);
    let body = KeySetBuilder::new()
        .with_x5t(&other)
        .with_x5c(&other)
        .with_raw_key(json!({ "kty": "EC" }))
        .build();
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&body, 1).await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(!authenticate(&auth, &cert).await.unwrap());
}

/// A pinned subject DN applies to certificates matched through x5c.
#[tokio::test]
async fn test_x5c_match_with_mismatched_pin_rejects() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_credential(
        TEST_CLIENT_ID_JWKS,
        RegisteredClientCredential {
            certificate: None,
            tls_client_auth_subject_dn: Some(format!("CN={}", TEST_OTHER_SUBJECT_CN)),
            jwks_uri: Some(jwks.url()),
        },
    ));

    assert!(!authenticate(&auth, &cert).await.unwrap());
}

/// The pin is compared against the x5c certificate's subject written
/// most-specific first.
#[tokio::test]
async fn test_x5c_match_with_most_specific_first_pin_authenticates() {
    let cert = TestCertificate::generate_with_subject(&[
        (DnType::CountryName, "US"),
        (DnType::OrganizationName, "Example"),
        (DnType::CommonName, TEST_SUBJECT_CN),
    ]);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_credential(
        TEST_CLIENT_ID_JWKS,
        RegisteredClientCredential {
            certificate: None,
            tls_client_auth_subject_dn: Some("CN=payments-api, O=Example, C=US".to_string()),
            jwks_uri: Some(jwks.url()),
        },
    ));

    assert!(authenticate(&auth, &cert).await.unwrap());
}

/// A configured JWKS URL wins over a static certificate that would match.
#[tokio::test]
async fn test_jwks_takes_precedence_over_static_certificate() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let other = TestCertificate::generate(TEST_OTHER_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&other).build(), 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_credential(
        TEST_CLIENT_ID_JWKS,
        RegisteredClientCredential {
            certificate: Some(cert.pem().to_string()),
            tls_client_auth_subject_dn: None,
            jwks_uri: Some(jwks.url()),
        },
    ));

    assert!(!authenticate(&auth, &cert).await.unwrap());
}

/// A document without a `keys` member matches nothing.
#[tokio::test]
async fn test_key_set_without_keys_rejects() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(r#"{"issuer":"https://idp.example.com"}"#, 1)
        .await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(!authenticate(&auth, &cert).await.unwrap());
}
