//! Fault injection tests for JWKS endpoint failures
//!
//! A client whose JWKS cannot be obtained is a server-side fault: the
//! request fails with `server_error` and nothing about the endpoint reaches
//! the client. Failed fetches are never cached.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{HeaderMap, StatusCode};
use mtls_client_auth::authenticator::{
    BodyParams, ClientAuthContext, ClientAuthRequest, ClientAuthenticator, MutualTlsAuthenticator,
    MutualTlsConfig,
};
use mtls_client_auth::errors::ClientAuthError;
use mtls_client_auth::registry::RegisteredClientCredential;
use mtls_test_utils::*;
use std::sync::Arc;

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
) -> Result<bool, ClientAuthError> {
    let request = ClientAuthRequest::new(HeaderMap::new()).with_certificate(cert.as_attribute());
    let mut context = ClientAuthContext::new();
    auth.authenticate_client(&request, &body(TEST_CLIENT_ID_JWKS), &mut context)
        .await
}

#[tokio::test]
async fn test_jwks_error_status_is_remote_fetch_error() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_status(503).await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    let err = authenticate(&auth, &cert).await.unwrap_err();
    assert!(matches!(err, ClientAuthError::RemoteFetch(_)), "{err}");
    assert_eq!(err.status_code(), 500);
}

/// Every attempt after a failure goes back to the endpoint.
#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_status(500).await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    assert!(authenticate(&auth, &cert).await.is_err());
    assert!(authenticate(&auth, &cert).await.is_err());

    assert_eq!(jwks.received_count().await, 2);
    assert!(auth.jwks().cache().is_empty().await);
}

#[tokio::test]
async fn test_unreachable_jwks_is_remote_fetch_error() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    // Port 9 (discard) is not listening.
    let auth = authenticator(
        MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, "http://127.0.0.1:9/jwks"),
    );

    let err = authenticate(&auth, &cert).await.unwrap_err();
    assert!(matches!(err, ClientAuthError::RemoteFetch(_)), "{err}");
}

#[tokio::test]
async fn test_non_json_key_set_is_malformed() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set("<html>maintenance</html>", 1).await;

    let auth = authenticator(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()));

    let err = authenticate(&auth, &cert).await.unwrap_err();
    assert!(matches!(err, ClientAuthError::MalformedKeySet(_)), "{err}");
}

#[tokio::test]
async fn test_non_http_jwks_url_is_configuration_error() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let auth = authenticator(MockClientRegistry::new().with_credential(
        TEST_CLIENT_ID_JWKS,
        RegisteredClientCredential {
            jwks_uri: Some("file:///etc/jwks.json".to_string()),
            ..Default::default()
        },
    ));

    let err = authenticate(&auth, &cert).await.unwrap_err();
    assert!(matches!(err, ClientAuthError::Configuration(_)), "{err}");
}

#[tokio::test]
async fn test_jwks_failure_response_does_not_leak_endpoint() {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_status(502).await;
    let service = TestAuthService::new(authenticator(
        MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()),
    ));

    service
        .post_client_auth(
            &format!("client_id={}", TEST_CLIENT_ID_JWKS),
            Some(cert.as_attribute()),
            &[],
        )
        .await
        .assert_oauth_error(StatusCode::INTERNAL_SERVER_ERROR, "server_error")
        .assert_body_omits("127.0.0.1")
        .assert_body_omits(TEST_JWKS_PATH);
}
