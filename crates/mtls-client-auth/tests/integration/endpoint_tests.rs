//! Integration tests for the HTTP endpoints
//!
//! The router is driven directly; the TLS-layer certificate is attached as
//! a request extension.

use axum::http::StatusCode;
use mtls_client_auth::authenticator::{MutualTlsAuthenticator, MutualTlsConfig};
use mtls_test_utils::*;
use std::sync::Arc;

fn service(registry: MockClientRegistry) -> Result<TestAuthService, anyhow::Error> {
    let config = MutualTlsConfig {
        auth_header: Some(TEST_CERT_HEADER.to_string()),
        ..Default::default()
    };
    let authenticator = MutualTlsAuthenticator::from_config(&config, Arc::new(registry))?;
    Ok(TestAuthService::new(authenticator))
}

fn form(client_id: &str) -> String {
    format!("grant_type=client_credentials&client_id={}", client_id)
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let service = service(MockClientRegistry::new())?;

    let response = service.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "OK");

    Ok(())
}

#[tokio::test]
async fn test_supported_methods_lists_tls_client_auth() -> Result<(), anyhow::Error> {
    let service = service(MockClientRegistry::new())?;

    let response = service.get("/oauth2/client-auth/methods").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body[0]["method"], "tls_client_auth");

    Ok(())
}

#[tokio::test]
async fn test_tls_certificate_authenticates() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let service = service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &cert))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID), Some(cert.as_attribute()), &[])
        .await
        .assert_authenticated_as(TEST_CLIENT_ID);

    Ok(())
}

#[tokio::test]
async fn test_forwarded_header_certificate_authenticates() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let service = service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &cert))?;
    let forwarded = cert.base64();

    service
        .post_client_auth(
            &form(TEST_CLIENT_ID),
            None,
            &[(TEST_CERT_HEADER, forwarded.as_str())],
        )
        .await
        .assert_authenticated_as(TEST_CLIENT_ID);

    Ok(())
}

#[tokio::test]
async fn test_jwks_client_authenticates() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let jwks = MockJwksServer::start().await;
    jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1)
        .await;
    let service =
        service(MockClientRegistry::new().with_jwks_client(TEST_CLIENT_ID_JWKS, &jwks.url()))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID_JWKS), Some(cert.as_attribute()), &[])
        .await
        .assert_authenticated_as(TEST_CLIENT_ID_JWKS);

    Ok(())
}

#[tokio::test]
async fn test_wrong_certificate_is_invalid_client() -> Result<(), anyhow::Error> {
    let registered = TestCertificate::generate(TEST_SUBJECT_CN);
    let presented = TestCertificate::generate(TEST_SUBJECT_CN);
    let service =
        service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &registered))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID), Some(presented.as_attribute()), &[])
        .await
        .assert_oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");

    Ok(())
}

#[tokio::test]
async fn test_missing_certificate_is_invalid_client() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let service = service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &cert))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID), None, &[])
        .await
        .assert_oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");

    Ok(())
}

#[tokio::test]
async fn test_unknown_client_is_invalid_client() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let service = service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &cert))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID_UNKNOWN), Some(cert.as_attribute()), &[])
        .await
        .assert_oauth_error(StatusCode::UNAUTHORIZED, "invalid_client")
        .assert_body_omits(TEST_CLIENT_ID_UNKNOWN);

    Ok(())
}

/// A header value that is not a certificate makes the authenticator
/// decline rather than fail.
#[tokio::test]
async fn test_undecodable_header_is_invalid_client() -> Result<(), anyhow::Error> {
    let cert = TestCertificate::generate(TEST_SUBJECT_CN);
    let service = service(MockClientRegistry::new().with_static_client(TEST_CLIENT_ID, &cert))?;

    service
        .post_client_auth(&form(TEST_CLIENT_ID), None, &[(TEST_CERT_HEADER, "garbage")])
        .await
        .assert_oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_responds() -> Result<(), anyhow::Error> {
    let service = service(MockClientRegistry::new())?;

    let response = service.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);

    Ok(())
}
