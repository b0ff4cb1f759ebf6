//! Router harness for HTTP-level tests.
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`,
//! so a TLS-layer certificate can be attached as a request extension the
//! way the TLS acceptor would.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use mtls_client_auth::authenticator::MutualTlsAuthenticator;
use mtls_client_auth::certificate::CertificateAttribute;
use mtls_client_auth::config::Config;
use mtls_client_auth::routes::{build_routes, AppState};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Wraps the service router around a given authenticator.
pub struct TestAuthService {
    router: Router,
}

impl TestAuthService {
    /// Build the router with default configuration.
    pub fn new(authenticator: MutualTlsAuthenticator) -> Self {
        let config = Config::from_vars(&HashMap::new()).expect("default config is valid");
        Self::with_config(authenticator, config)
    }

    pub fn with_config(authenticator: MutualTlsAuthenticator, config: Config) -> Self {
        // A recorder that is not installed globally, so tests can build
        // routers in parallel.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let state = Arc::new(AppState {
            authenticator: Arc::new(authenticator),
            config,
        });

        Self {
            router: build_routes(state, metrics_handle),
        }
    }

    /// POST a form body to the client authentication endpoint.
    pub async fn post_client_auth(
        &self,
        form: &str,
        certificate: Option<CertificateAttribute>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/oauth2/client-auth")
            .header("content-type", "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let mut request = builder
            .body(Body::from(form.to_string()))
            .expect("valid request");
        if let Some(certificate) = certificate {
            request.extensions_mut().insert(certificate);
        }

        self.send(request).await
    }

    /// GET `uri` from the router.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }
}
