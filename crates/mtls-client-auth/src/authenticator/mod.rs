//! Client authenticators for the token endpoint.
//!
//! # Components
//!
//! - `context` - state shared between authenticators for one request
//! - `request` - headers, TLS certificates and body parameters of a request
//! - `mutual_tls` - certificate-bound client authentication (RFC 8705)

pub mod context;
pub mod mutual_tls;
pub mod request;

pub use context::{AuthenticatorType, ClientAuthContext, PriorAuthentication};
pub use mutual_tls::{MutualTlsAuthenticator, MutualTlsConfig};
pub use request::{body_param, BodyParams, ClientAuthRequest};

use crate::errors::ClientAuthError;
use async_trait::async_trait;
use common::types::ClientId;
use serde::Serialize;

/// A client authentication method an authenticator supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientAuthenticationMethod {
    /// Registered method name, e.g. `tls_client_auth`.
    pub method: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
}

/// A client authenticator in the token endpoint pipeline.
///
/// The pipeline calls `can_authenticate` on each authenticator and runs
/// `authenticate_client` on one that accepts.
#[async_trait]
pub trait ClientAuthenticator: Send + Sync {
    /// Stable name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Cheap applicability check. Performs no network calls and no
    /// certificate parsing.
    fn can_authenticate(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &ClientAuthContext,
    ) -> bool;

    /// Authenticate the client.
    ///
    /// `Ok(false)` means the client was not authenticated (or the
    /// authenticator does not apply); `Err` is a fatal failure to report.
    ///
    /// # Errors
    ///
    /// Returns a `ClientAuthError` for registry, configuration, JWKS and
    /// certificate encoding failures.
    async fn authenticate_client(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &mut ClientAuthContext,
    ) -> Result<bool, ClientAuthError>;

    /// Client identifier the request claims, if any.
    fn client_id(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &ClientAuthContext,
    ) -> Option<ClientId>;

    /// Methods this authenticator implements.
    fn supported_authentication_methods(&self) -> Vec<ClientAuthenticationMethod>;
}
