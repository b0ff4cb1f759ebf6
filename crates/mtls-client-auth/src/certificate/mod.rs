//! Client certificate handling.
//!
//! # Components
//!
//! - `decoder` - turns header-supplied certificate strings into certificates
//! - `thumbprint` - SHA-256 thumbprints and trust comparison
//!
//! A [`ClientCertificate`] owns the DER encoding of exactly one X.509
//! certificate. The subject DN is extracted when the certificate is
//! parsed, so each presented certificate is parsed once per request.

pub mod decoder;
pub mod thumbprint;

pub use decoder::{decode_certificate, sanitize_certificate};
pub use thumbprint::{matches, Thumbprint};

use std::fmt;
use thiserror::Error;
use x509_parser::objects::{oid2abbrev, oid_registry};
use x509_parser::prelude::*;

/// DER bytes could not be parsed as an X.509 certificate.
#[derive(Debug, Error)]
#[error("Invalid X.509 certificate: {0}")]
pub struct CertificateParseError(pub String);

/// A parsed X.509 certificate.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    der: Vec<u8>,
    subject_dn: String,
}

impl ClientCertificate {
    /// Parse the first certificate in `bytes`.
    ///
    /// Bytes following the certificate are ignored and do not contribute
    /// to its thumbprint.
    pub fn from_der(bytes: &[u8]) -> Result<Self, CertificateParseError> {
        let (remaining, cert) = X509Certificate::from_der(bytes)
            .map_err(|e| CertificateParseError(e.to_string()))?;

        let subject_dn = rfc4514_name(cert.subject());
        let consumed = bytes.len().saturating_sub(remaining.len());
        let der = bytes
            .get(..consumed)
            .ok_or_else(|| CertificateParseError("certificate length out of range".to_string()))?
            .to_vec();

        Ok(Self { der, subject_dn })
    }

    /// DER encoding of the certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Subject distinguished name in RFC 4514 order, e.g.
    /// `CN=client-a, O=Example, C=US`.
    pub fn subject_dn(&self) -> &str {
        &self.subject_dn
    }

    /// SHA-256 thumbprint (`x5t#S256` form).
    pub fn thumbprint(&self) -> Thumbprint {
        Thumbprint::of(self)
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("subject_dn", &self.subject_dn)
            .field("thumbprint", &self.thumbprint().as_str())
            .finish()
    }
}

/// Render a name as RFC 4514 does: RDNs in reverse encoding order,
/// multi-valued RDNs joined with `+`.
///
/// Attributes without a registered short name use the dotted OID; values
/// that are not strings are rendered as `#` and the hex of their encoding.
fn rfc4514_name(name: &X509Name<'_>) -> String {
    let mut rdns: Vec<String> = name
        .iter()
        .map(|rdn| {
            rdn.iter()
                .map(|attr| {
                    let key = oid2abbrev(attr.attr_type(), oid_registry())
                        .map(str::to_string)
                        .unwrap_or_else(|_| attr.attr_type().to_id_string());
                    let value = attr
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|_| format!("#{}", hex::encode(attr.attr_value().data)));
                    format!("{}={}", key, value)
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect();
    rdns.reverse();
    rdns.join(", ")
}

/// Certificates placed on the request by the TLS-terminating container.
///
/// Either the single client certificate or the whole presented chain,
/// leaf first. The bytes have not been parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateAttribute {
    Single(Vec<u8>),
    Chain(Vec<Vec<u8>>),
}

impl CertificateAttribute {
    /// The client's own certificate, if the attribute carries one.
    pub fn leaf(&self) -> Option<&[u8]> {
        let der = match self {
            CertificateAttribute::Single(der) => Some(der.as_slice()),
            CertificateAttribute::Chain(chain) => chain.first().map(Vec::as_slice),
        };
        der.filter(|der| !der.is_empty())
    }
}
