//! Client authentication error types.
//!
//! Every failure past the applicability check is a `ClientAuthError`
//! carrying an OAuth 2.0 error code. The token endpoint catches it once
//! and renders the RFC 6749 §5.2 error body. Details of server-side faults
//! are logged here and never returned to the client.

use crate::registry::RegistryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::OAuthErrorCode;
use serde::Serialize;
use thiserror::Error;

/// Client authentication error type.
///
/// Maps to OAuth error codes:
/// - UnknownClient, CertificateDecode: `invalid_client` (401)
/// - everything else: `server_error` (500)
#[derive(Debug, Error)]
pub enum ClientAuthError {
    /// Header-supplied certificate could not be decoded.
    ///
    /// The authenticator resolves this locally by declining; it only
    /// escapes when a caller decodes certificates directly.
    #[error("Certificate decode error: {0}")]
    CertificateDecode(String),

    /// A container-supplied certificate has an unusable encoding.
    #[error("Certificate encoding error: {0}")]
    CertificateEncoding(String),

    /// Client was routed to the JWKS branch without a usable JWKS URL.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Registration store failed while loading client metadata.
    #[error("Client registry error: {0}")]
    RegistryRetrieval(String),

    /// Client identifier or its tenant could not be resolved.
    #[error("Unknown client: {0}")]
    UnknownClient(String),

    /// JWKS endpoint unreachable, timed out, or answered with an error.
    #[error("JWKS fetch error: {0}")]
    RemoteFetch(String),

    /// Fetched key set is structurally invalid or embeds a bad certificate.
    #[error("Malformed key set: {0}")]
    MalformedKeySet(String),
}

impl ClientAuthError {
    /// OAuth error code reported for this failure.
    pub fn error_code(&self) -> OAuthErrorCode {
        match self {
            ClientAuthError::CertificateDecode(_) | ClientAuthError::UnknownClient(_) => {
                OAuthErrorCode::InvalidClient
            }
            ClientAuthError::CertificateEncoding(_)
            | ClientAuthError::Configuration(_)
            | ClientAuthError::RegistryRetrieval(_)
            | ClientAuthError::RemoteFetch(_)
            | ClientAuthError::MalformedKeySet(_) => OAuthErrorCode::ServerError,
        }
    }

    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        if self.error_code().is_server_side() {
            500
        } else {
            401
        }
    }
}

impl From<RegistryError> for ClientAuthError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidClient(reason) => ClientAuthError::UnknownClient(reason),
            RegistryError::Retrieval(reason) => ClientAuthError::RegistryRetrieval(reason),
        }
    }
}

#[derive(Serialize)]
struct OAuthErrorResponse {
    error: OAuthErrorCode,
    error_description: String,
}

impl IntoResponse for ClientAuthError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let (status, description) = if code.is_server_side() {
            // Log actual error server-side, return generic message to client
            tracing::error!(target: "mtls.errors", error = %self, "Client authentication failed with server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Client authentication could not be completed".to_string(),
            )
        } else {
            (StatusCode::UNAUTHORIZED, "Client authentication failed".to_string())
        };

        let body = OAuthErrorResponse {
            error: code,
            error_description: description,
        };

        (status, Json(body)).into_response()
    }
}

/// Response for a request the authenticator declined or rejected.
///
/// Not an error in the authenticator's sense, but the endpoint answers it
/// with the same `invalid_client` body.
pub fn invalid_client_response() -> Response {
    let body = OAuthErrorResponse {
        error: OAuthErrorCode::InvalidClient,
        error_description: "Client authentication failed".to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
