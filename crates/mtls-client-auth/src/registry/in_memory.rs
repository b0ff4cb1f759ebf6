//! In-memory client registry, optionally loaded from a JSON file.
//!
//! File format:
//!
//! ```json
//! {
//!   "clients": [
//!     {
//!       "client_id": "payments-api",
//!       "tenant": "example.com",
//!       "certificate": "-----BEGIN CERTIFICATE-----...",
//!       "tls_client_auth_subject_dn": "CN=payments-api",
//!       "jwks_uri": null
//!     }
//!   ]
//! }
//! ```
//!
//! `tenant` defaults to `carbon.super`.

use super::{ClientRegistry, RegisteredClientCredential, RegistryError};
use async_trait::async_trait;
use common::types::{ClientId, TenantDomain};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    clients: Vec<ClientEntry>,
}

#[derive(Debug, Deserialize)]
struct ClientEntry {
    client_id: String,
    #[serde(default)]
    tenant: Option<String>,
    #[serde(flatten)]
    credential: RegisteredClientCredential,
}

#[derive(Debug, Clone)]
struct Registration {
    tenant: TenantDomain,
    credential: RegisteredClientCredential,
}

/// Registry holding every registration in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientRegistry {
    clients: HashMap<ClientId, Registration>,
}

impl InMemoryClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client_id` under `tenant`, replacing any earlier entry.
    pub fn insert(
        &mut self,
        client_id: ClientId,
        tenant: TenantDomain,
        credential: RegisteredClientCredential,
    ) {
        self.clients
            .insert(client_id, Registration { tenant, credential });
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_client(
        mut self,
        client_id: ClientId,
        tenant: TenantDomain,
        credential: RegisteredClientCredential,
    ) -> Self {
        self.insert(client_id, tenant, credential);
        self
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Parse a registry document.
    ///
    /// # Errors
    ///
    /// `RegistryError::Retrieval` if the document is not valid or contains a
    /// blank client identifier.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|e| RegistryError::Retrieval(format!("Invalid client registry document: {}", e)))?;

        let mut registry = Self::new();
        for entry in file.clients {
            let client_id = ClientId::new(entry.client_id).ok_or_else(|| {
                RegistryError::Retrieval("Client registry contains a blank client_id".to_string())
            })?;
            let tenant = entry.tenant.map(TenantDomain::new).unwrap_or_default();
            registry.insert(client_id, tenant, entry.credential);
        }
        Ok(registry)
    }

    /// Load a registry document from disk.
    ///
    /// # Errors
    ///
    /// `RegistryError::Retrieval` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::Retrieval(format!(
                "Failed to read client registry {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    fn registration(&self, client_id: &ClientId) -> Result<&Registration, RegistryError> {
        self.clients
            .get(client_id)
            .ok_or_else(|| RegistryError::InvalidClient(format!("Unknown client {}", client_id)))
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn tenant_of(&self, client_id: &ClientId) -> Result<TenantDomain, RegistryError> {
        Ok(self.registration(client_id)?.tenant.clone())
    }

    async fn credential(
        &self,
        client_id: &ClientId,
        tenant: &TenantDomain,
    ) -> Result<RegisteredClientCredential, RegistryError> {
        let registration = self.registration(client_id)?;
        if registration.tenant != *tenant {
            return Err(RegistryError::InvalidClient(format!(
                "Client {} is not registered in tenant {}",
                client_id, tenant
            )));
        }
        Ok(registration.credential.clone())
    }
}
