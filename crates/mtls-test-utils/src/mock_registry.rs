//! Call-counting client registry.

use crate::cert_fixtures::TestCertificate;
use crate::test_ids::TEST_TENANT;
use async_trait::async_trait;
use common::types::{ClientId, TenantDomain};
use mtls_client_auth::registry::{ClientRegistry, InMemoryClientRegistry, RegisteredClientCredential, RegistryError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Registry backed by [`InMemoryClientRegistry`] that counts lookups and
/// can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct MockClientRegistry {
    inner: InMemoryClientRegistry,
    fail_credential_lookup: bool,
    tenant_lookups: AtomicUsize,
    credential_lookups: AtomicUsize,
}

impl MockClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under [`TEST_TENANT`].
    pub fn with_credential(mut self, client_id: &str, credential: RegisteredClientCredential) -> Self {
        let client_id = ClientId::new(client_id).expect("test client id is not blank");
        self.inner.insert(client_id, TenantDomain::new(TEST_TENANT), credential);
        self
    }

    /// Register a client with a static PEM certificate.
    pub fn with_static_client(self, client_id: &str, cert: &TestCertificate) -> Self {
        self.with_credential(
            client_id,
            RegisteredClientCredential {
                certificate: Some(cert.pem().to_string()),
                ..Default::default()
            },
        )
    }

    /// Register a client with a JWKS endpoint.
    pub fn with_jwks_client(self, client_id: &str, jwks_uri: &str) -> Self {
        self.with_credential(
            client_id,
            RegisteredClientCredential {
                jwks_uri: Some(jwks_uri.to_string()),
                ..Default::default()
            },
        )
    }

    /// Make every credential lookup fail with `RegistryError::Retrieval`.
    pub fn failing_credential_lookup(mut self) -> Self {
        self.fail_credential_lookup = true;
        self
    }

    pub fn tenant_lookups(&self) -> usize {
        self.tenant_lookups.load(Ordering::SeqCst)
    }

    pub fn credential_lookups(&self) -> usize {
        self.credential_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientRegistry for MockClientRegistry {
    async fn tenant_of(&self, client_id: &ClientId) -> Result<TenantDomain, RegistryError> {
        self.tenant_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.tenant_of(client_id).await
    }

    async fn credential(
        &self,
        client_id: &ClientId,
        tenant: &TenantDomain,
    ) -> Result<RegisteredClientCredential, RegistryError> {
        self.credential_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_credential_lookup {
            return Err(RegistryError::Retrieval(
                "simulated registry outage".to_string(),
            ));
        }
        self.inner.credential(client_id, tenant).await
    }
}
