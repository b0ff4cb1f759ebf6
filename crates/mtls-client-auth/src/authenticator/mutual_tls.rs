//! Mutual TLS client authentication.
//!
//! A client is authenticated when the certificate it presented matches
//! the one registered for it: either a statically registered certificate
//! (optionally with a pinned subject DN), or a certificate published in
//! the client's JWKS. A configured JWKS URL takes precedence.
//!
//! # Security
//!
//! - Trust is decided by thumbprint equality plus the optional exact
//!   subject DN pin, never by other request fields
//! - The forwarding header is only consulted when configured; it must be
//!   set by a trusted TLS-terminating proxy
//! - Certificate contents and client identifiers are not logged in clear

use super::context::{AuthenticatorType, ClientAuthContext};
use super::request::{body_param, BodyParams, ClientAuthRequest};
use super::{ClientAuthenticationMethod, ClientAuthenticator};
use crate::certificate::{self, decode_certificate, ClientCertificate};
use crate::errors::ClientAuthError;
use crate::jwks::{self, HttpJwksFetcher, JwksCache, JwksProvider, DEFAULT_MAX_RESPONSE_BYTES};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_client_auth, record_error};
use crate::registry::{ClientRegistry, RegisteredClientCredential};
use async_trait::async_trait;
use common::config::HttpTimeouts;
use common::types::{ClientId, TenantDomain};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Body parameter carrying the client identifier.
const CLIENT_ID_PARAM: &str = "client_id";

/// RFC 8705 §2.1 PKI method.
pub const TLS_CLIENT_AUTH: ClientAuthenticationMethod = ClientAuthenticationMethod {
    method: "tls_client_auth",
    display_name: "Mutual TLS",
};

/// Settings for [`MutualTlsAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutualTlsConfig {
    /// Header a trusted proxy forwards the client certificate in.
    pub auth_header: Option<String>,
    /// Timeouts for JWKS fetches.
    pub jwks_timeouts: HttpTimeouts,
    /// Largest JWKS document accepted, in bytes.
    pub jwks_max_response_bytes: usize,
    /// Lifetime of cached JWKS documents; `None` keeps them for the
    /// process lifetime.
    pub jwks_cache_ttl: Option<Duration>,
}

impl Default for MutualTlsConfig {
    fn default() -> Self {
        Self {
            auth_header: None,
            jwks_timeouts: HttpTimeouts::default(),
            jwks_max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            jwks_cache_ttl: None,
        }
    }
}

/// Authenticates clients by the certificate presented over mutual TLS.
pub struct MutualTlsAuthenticator {
    auth_header: Option<String>,
    registry: Arc<dyn ClientRegistry>,
    jwks: JwksProvider,
}

impl MutualTlsAuthenticator {
    pub fn new(
        config: &MutualTlsConfig,
        registry: Arc<dyn ClientRegistry>,
        jwks: JwksProvider,
    ) -> Self {
        let auth_header = config
            .auth_header
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self {
            auth_header,
            registry,
            jwks,
        }
    }

    /// Build the authenticator with an HTTP-backed JWKS provider.
    ///
    /// # Errors
    ///
    /// Returns `ClientAuthError::Configuration` if the HTTP client cannot
    /// be built.
    pub fn from_config(
        config: &MutualTlsConfig,
        registry: Arc<dyn ClientRegistry>,
    ) -> Result<Self, ClientAuthError> {
        let cache = match config.jwks_cache_ttl {
            Some(ttl) => JwksCache::with_ttl(ttl),
            None => JwksCache::new(),
        };
        let fetcher = HttpJwksFetcher::new(config.jwks_timeouts, config.jwks_max_response_bytes)?;
        Ok(Self::new(
            config,
            registry,
            JwksProvider::new(cache, Arc::new(fetcher)),
        ))
    }

    /// The JWKS provider, for cache management.
    pub fn jwks(&self) -> &JwksProvider {
        &self.jwks
    }

    fn resolve_client_id(&self, body: &BodyParams, context: &ClientAuthContext) -> Option<ClientId> {
        context
            .client_id()
            .cloned()
            .or_else(|| body_param(body, CLIENT_ID_PARAM).and_then(ClientId::new))
    }

    fn forwarded_certificate<'r>(&self, request: &'r ClientAuthRequest) -> Option<&'r str> {
        let name = self.auth_header.as_deref()?;
        request.header(name).filter(|value| !value.trim().is_empty())
    }

    /// Presented certificate, preferring the TLS layer over the header.
    ///
    /// `Ok(None)` when neither source yields a certificate; a header value
    /// that fails to decode counts as absent.
    fn presented_certificate(
        &self,
        request: &ClientAuthRequest,
    ) -> Result<Option<ClientCertificate>, ClientAuthError> {
        if let Some(der) = request.certificate_attribute().and_then(|attr| attr.leaf()) {
            return ClientCertificate::from_der(der)
                .map(Some)
                .map_err(|e| ClientAuthError::CertificateEncoding(e.to_string()));
        }

        let Some(content) = self.forwarded_certificate(request) else {
            return Ok(None);
        };

        match decode_certificate(content) {
            Ok(cert) => Ok(Some(cert)),
            Err(e) => {
                warn!(
                    target: "mtls.authenticator",
                    error = %e,
                    "Unable to parse the client certificate forwarded in header"
                );
                Ok(None)
            }
        }
    }

    #[instrument(skip_all, name = "mtls.authenticate_client")]
    async fn authenticate(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &mut ClientAuthContext,
    ) -> Result<bool, ClientAuthError> {
        if context
            .prior_authentication()
            .succeeded_with_other_than(AuthenticatorType::MutualTls)
        {
            debug!(target: "mtls.authenticator", "Request already authenticated by another method");
            return Ok(false);
        }

        // Consumed by certificate-bound token issuance
        context.record_authenticator(AuthenticatorType::MutualTls);

        let Some(client_id) = self.resolve_client_id(body, context) else {
            debug!(target: "mtls.authenticator", "No client id in request, declining");
            return Ok(false);
        };
        context.set_client_id(client_id.clone());
        let client_hash = hash_for_correlation(client_id.as_str());

        let Some(presented) = self.presented_certificate(request)? else {
            debug!(
                target: "mtls.authenticator",
                client = %client_hash,
                "No client certificate found in request"
            );
            return Ok(false);
        };

        let tenant = self.registry.tenant_of(&client_id).await?;
        let credential = self.registry.credential(&client_id, &tenant).await?;

        if credential.has_jwks_uri() {
            debug!(
                target: "mtls.authenticator",
                client = %client_hash,
                tenant = %tenant,
                "Validating client certificate against registered JWKS"
            );
            self.authenticate_with_jwks(&credential, &presented).await
        } else {
            debug!(
                target: "mtls.authenticator",
                client = %client_hash,
                tenant = %tenant,
                "Validating client certificate against registered certificate"
            );
            authenticate_with_certificate(&credential, &presented, &tenant)
        }
    }

    async fn authenticate_with_jwks(
        &self,
        credential: &RegisteredClientCredential,
        presented: &ClientCertificate,
    ) -> Result<bool, ClientAuthError> {
        let url = resolve_jwks_url(credential.jwks_uri.as_deref().unwrap_or_default())?;
        let key_set = self.jwks.key_set(&url).await?;
        jwks::find_match(&key_set, presented, credential.pinned_subject_dn())
    }
}

fn authenticate_with_certificate(
    credential: &RegisteredClientCredential,
    presented: &ClientCertificate,
    tenant: &TenantDomain,
) -> Result<bool, ClientAuthError> {
    let content = credential
        .certificate
        .as_deref()
        .filter(|cert| !cert.trim().is_empty())
        .ok_or_else(|| {
            ClientAuthError::RegistryRetrieval(format!(
                "No certificate registered for client in tenant {}",
                tenant
            ))
        })?;

    let registered = decode_certificate(content).map_err(|e| {
        ClientAuthError::RegistryRetrieval(format!("Registered certificate is invalid: {}", e))
    })?;

    Ok(certificate::matches(
        &registered,
        presented,
        credential.pinned_subject_dn(),
    ))
}

/// Parse a registered JWKS URL.
///
/// # Errors
///
/// Returns `ClientAuthError::Configuration` if the URL is blank or is not
/// an absolute `http`/`https` URL.
pub fn resolve_jwks_url(raw: &str) -> Result<Url, ClientAuthError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientAuthError::Configuration(
            "Client has no JWKS URL configured".to_string(),
        ));
    }

    let url = Url::parse(raw).map_err(|e| {
        ClientAuthError::Configuration(format!("JWKS URL might be malformed: {}", e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ClientAuthError::Configuration(format!(
            "JWKS URL has unsupported scheme {}",
            scheme
        ))),
    }
}

#[async_trait]
impl ClientAuthenticator for MutualTlsAuthenticator {
    fn name(&self) -> &'static str {
        "MutualTlsAuthenticator"
    }

    fn can_authenticate(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &ClientAuthContext,
    ) -> bool {
        if context
            .prior_authentication()
            .succeeded_with_other_than(AuthenticatorType::MutualTls)
        {
            debug!(target: "mtls.authenticator", "Request already authenticated by another method");
            return false;
        }

        if self.resolve_client_id(body, context).is_none() {
            debug!(target: "mtls.authenticator", "Client id is not available in the request");
            return false;
        }

        if request
            .certificate_attribute()
            .and_then(|attr| attr.leaf())
            .is_some()
        {
            return true;
        }

        if self.forwarded_certificate(request).is_some() {
            return true;
        }

        debug!(target: "mtls.authenticator", "No client certificate found in request");
        false
    }

    async fn authenticate_client(
        &self,
        request: &ClientAuthRequest,
        body: &BodyParams,
        context: &mut ClientAuthContext,
    ) -> Result<bool, ClientAuthError> {
        let start = Instant::now();
        let result = self.authenticate(request, body, context).await;

        let outcome = match &result {
            Ok(true) => "authenticated",
            Ok(false) => "rejected",
            Err(e) => {
                record_error(e.error_code().as_str(), e.status_code());
                "errored"
            }
        };
        record_client_auth(outcome, start.elapsed());
        debug!(target: "mtls.authenticator", outcome, "Client authentication finished");

        result
    }

    fn client_id(
        &self,
        _request: &ClientAuthRequest,
        body: &BodyParams,
        context: &ClientAuthContext,
    ) -> Option<ClientId> {
        self.resolve_client_id(body, context)
    }

    fn supported_authentication_methods(&self) -> Vec<ClientAuthenticationMethod> {
        vec![TLS_CLIENT_AUTH]
    }
}
