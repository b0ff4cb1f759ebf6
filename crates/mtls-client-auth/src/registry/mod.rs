//! Client registration lookup.
//!
//! The registry owns client metadata; this crate only reads it. Lookups
//! distinguish an unknown client (client-side fault) from a store that
//! could not answer (server-side fault).

pub mod in_memory;

pub use in_memory::InMemoryClientRegistry;

use async_trait::async_trait;
use common::types::{ClientId, TenantDomain};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry lookup failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Client or its tenant is not registered.
    #[error("Invalid client: {0}")]
    InvalidClient(String),

    /// The registration store failed.
    #[error("Registry retrieval failed: {0}")]
    Retrieval(String),
}

/// mTLS-related metadata registered for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClientCredential {
    /// Static client certificate (PEM or base64 DER).
    #[serde(default)]
    pub certificate: Option<String>,

    /// Subject DN the presented certificate must carry, if pinned.
    #[serde(default)]
    pub tls_client_auth_subject_dn: Option<String>,

    /// JWKS endpoint publishing the client's certificates.
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

impl RegisteredClientCredential {
    /// Non-empty pinned subject DN.
    pub fn pinned_subject_dn(&self) -> Option<&str> {
        self.tls_client_auth_subject_dn
            .as_deref()
            .filter(|dn| !dn.trim().is_empty())
    }

    /// Whether a JWKS endpoint is configured. Takes precedence over a
    /// static certificate.
    pub fn has_jwks_uri(&self) -> bool {
        self.jwks_uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }
}

/// Read access to client registrations.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Tenant the client is registered under.
    ///
    /// # Errors
    ///
    /// `RegistryError::InvalidClient` if the client is unknown.
    async fn tenant_of(&self, client_id: &ClientId) -> Result<TenantDomain, RegistryError>;

    /// Credential registered for the client in `tenant`.
    ///
    /// # Errors
    ///
    /// `RegistryError::InvalidClient` if the client is not registered in the
    /// tenant, `RegistryError::Retrieval` if the store fails.
    async fn credential(
        &self,
        client_id: &ClientId,
        tenant: &TenantDomain,
    ) -> Result<RegisteredClientCredential, RegistryError>;
}
