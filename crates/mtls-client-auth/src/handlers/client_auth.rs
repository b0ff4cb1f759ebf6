//! Client authentication endpoint.
//!
//! Runs the token endpoint's client authentication step on its own:
//! a form-encoded token request comes in, and the response says which
//! client was authenticated or carries the RFC 6749 §5.2 error body.

use crate::authenticator::{BodyParams, ClientAuthContext, ClientAuthRequest, ClientAuthenticationMethod};
use crate::certificate::CertificateAttribute;
use crate::errors::{invalid_client_response, ClientAuthError};
use crate::routes::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Successful client authentication.
#[derive(Debug, Serialize)]
pub struct ClientAuthResponse {
    pub client_id: String,
    pub authentication_method: &'static str,
}

/// Handler for POST /oauth2/client-auth
///
/// The client certificate comes from the TLS layer (a
/// [`CertificateAttribute`] request extension) or, when configured, the
/// trusted forwarding header.
#[instrument(skip_all, name = "mtls.client_auth")]
pub async fn authenticate_client(
    State(state): State<Arc<AppState>>,
    certificate: Option<Extension<CertificateAttribute>>,
    headers: HeaderMap,
    Form(params): Form<Vec<(String, String)>>,
) -> Result<Response, ClientAuthError> {
    let mut request = ClientAuthRequest::new(headers);
    if let Some(Extension(certificate)) = certificate {
        request = request.with_certificate(certificate);
    }

    let mut body = BodyParams::new();
    for (name, value) in params {
        body.entry(name).or_default().push(value);
    }

    let authenticator = &state.authenticator;
    let mut context = ClientAuthContext::new();

    if !authenticator.can_authenticate(&request, &body, &context) {
        return Ok(invalid_client_response());
    }

    if !authenticator
        .authenticate_client(&request, &body, &mut context)
        .await?
    {
        return Ok(invalid_client_response());
    }

    let client_id = context
        .client_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();
    let authentication_method = authenticator
        .supported_authentication_methods()
        .first()
        .map_or("tls_client_auth", |m| m.method);

    Ok((
        StatusCode::OK,
        Json(ClientAuthResponse {
            client_id,
            authentication_method,
        }),
    )
        .into_response())
}

/// Handler for GET /oauth2/client-auth/methods
#[instrument(skip_all, name = "mtls.client_auth.methods")]
pub async fn supported_methods(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ClientAuthenticationMethod>> {
    Json(state.authenticator.supported_authentication_methods())
}
