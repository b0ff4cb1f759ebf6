//! Custom test assertions for client authentication responses.

use crate::service_harness::TestResponse;
use axum::http::StatusCode;

/// Assertions on responses from `POST /oauth2/client-auth`.
///
/// # Example
/// ```rust,ignore
/// service
///     .post_client_auth("client_id=payments-api", Some(cert.as_attribute()), &[])
///     .await
///     .assert_authenticated_as("payments-api");
/// ```
pub trait ClientAuthAssertions {
    /// Assert a 200 naming `client_id` and the `tls_client_auth` method.
    fn assert_authenticated_as(&self, client_id: &str) -> &Self;

    /// Assert an RFC 6749 error body with `status` and `error` code.
    fn assert_oauth_error(&self, status: StatusCode, error: &str) -> &Self;

    /// Assert the body does not mention `needle` anywhere.
    fn assert_body_omits(&self, needle: &str) -> &Self;
}

impl ClientAuthAssertions for TestResponse {
    fn assert_authenticated_as(&self, client_id: &str) -> &Self {
        assert_eq!(
            self.status,
            StatusCode::OK,
            "Expected successful authentication, got {} with body {}",
            self.status,
            self.body
        );
        assert_eq!(self.body["client_id"], client_id);
        assert_eq!(self.body["authentication_method"], "tls_client_auth");
        self
    }

    fn assert_oauth_error(&self, status: StatusCode, error: &str) -> &Self {
        assert_eq!(
            self.status, status,
            "Unexpected status, body was {}",
            self.body
        );
        assert_eq!(self.body["error"], error, "Unexpected error code");
        assert!(
            self.body["error_description"].is_string(),
            "Error body must carry error_description"
        );
        self
    }

    fn assert_body_omits(&self, needle: &str) -> &Self {
        assert!(
            !self.body.to_string().contains(needle),
            "Response body leaked {needle:?}: {}",
            self.body
        );
        self
    }
}
