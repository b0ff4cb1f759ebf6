//! State shared between client authenticators handling one request.

use common::types::ClientId;
use serde::Serialize;
use std::fmt;

/// Client authentication schemes an authenticator may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticatorType {
    MutualTls,
    ClientSecret,
    PrivateKeyJwt,
}

impl AuthenticatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticatorType::MutualTls => "mtls",
            AuthenticatorType::ClientSecret => "client_secret",
            AuthenticatorType::PrivateKeyJwt => "private_key_jwt",
        }
    }
}

impl fmt::Display for AuthenticatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What earlier authenticators in the pipeline concluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorAuthentication {
    #[default]
    None,
    Succeeded(AuthenticatorType),
}

impl PriorAuthentication {
    /// Whether another scheme has already authenticated the request.
    pub fn succeeded_with_other_than(&self, authenticator: AuthenticatorType) -> bool {
        matches!(self, PriorAuthentication::Succeeded(t) if *t != authenticator)
    }
}

/// Per-request authentication context.
///
/// The prior outcome is fixed at construction; authenticators write only
/// the resolved client id and the type of authenticator that handled the
/// request.
#[derive(Debug, Clone, Default)]
pub struct ClientAuthContext {
    client_id: Option<ClientId>,
    authenticator_type: Option<AuthenticatorType>,
    prior: PriorAuthentication,
}

impl ClientAuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a request an earlier authenticator already handled.
    pub fn with_prior(prior: PriorAuthentication) -> Self {
        Self {
            prior,
            ..Self::default()
        }
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn set_client_id(&mut self, client_id: ClientId) {
        self.client_id = Some(client_id);
    }

    pub fn authenticator_type(&self) -> Option<AuthenticatorType> {
        self.authenticator_type
    }

    pub fn record_authenticator(&mut self, authenticator: AuthenticatorType) {
        self.authenticator_type = Some(authenticator);
    }

    pub fn prior_authentication(&self) -> PriorAuthentication {
        self.prior
    }
}
