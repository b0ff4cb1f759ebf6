//! The parts of a token request an authenticator may inspect.

use crate::certificate::CertificateAttribute;
use axum::http::HeaderMap;
use std::collections::HashMap;

/// Form body parameters; a name may repeat.
pub type BodyParams = HashMap<String, Vec<String>>;

/// First value of body parameter `name`.
pub fn body_param<'a>(body: &'a BodyParams, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// Request headers plus any certificates the TLS layer attached.
#[derive(Debug, Clone, Default)]
pub struct ClientAuthRequest {
    headers: HeaderMap,
    certificate: Option<CertificateAttribute>,
}

impl ClientAuthRequest {
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            certificate: None,
        }
    }

    #[must_use]
    pub fn with_certificate(mut self, certificate: CertificateAttribute) -> Self {
        self.certificate = Some(certificate);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of header `name`, if present and valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Certificates attached by the TLS layer.
    pub fn certificate_attribute(&self) -> Option<&CertificateAttribute> {
        self.certificate.as_ref()
    }
}
