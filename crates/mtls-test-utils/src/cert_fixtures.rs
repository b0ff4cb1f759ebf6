//! Certificate fixtures.
//!
//! Certificates are self-signed and generated per test with rcgen; no
//! certificate material is checked in.

use base64::{engine::general_purpose::STANDARD, Engine};
use mtls_client_auth::certificate::{CertificateAttribute, ClientCertificate};
use rcgen::{CertificateParams, DistinguishedName, KeyPair};

pub use rcgen::DnType;

/// A generated certificate in every encoding the tests need.
#[derive(Debug, Clone)]
pub struct TestCertificate {
    der: Vec<u8>,
    pem: String,
}

impl TestCertificate {
    /// Generate a self-signed certificate with subject `CN=<common_name>`.
    pub fn generate(common_name: &str) -> Self {
        Self::generate_with_org(common_name, None)
    }

    /// Generate a certificate with subject `CN=<common_name>, O=<org>`.
    pub fn generate_with_org(common_name: &str, organization: Option<&str>) -> Self {
        let mut subject = Vec::new();
        if let Some(org) = organization {
            subject.push((DnType::OrganizationName, org));
        }
        subject.push((DnType::CommonName, common_name));
        Self::generate_with_subject(&subject)
    }

    /// Generate a certificate whose subject RDNs are encoded in the given
    /// order, most significant first as a CA would (`C`, `O`, ..., `CN`).
    pub fn generate_with_subject(subject: &[(DnType, &str)]) -> Self {
        let common_name = subject
            .iter()
            .find(|(kind, _)| *kind == DnType::CommonName)
            .map_or("client", |(_, value)| *value);
        let mut params = CertificateParams::new(vec![format!("{common_name}.example.com")])
            .expect("valid subject alt name");
        let mut dn = DistinguishedName::new();
        for (kind, value) in subject {
            dn.push(kind.clone(), *value);
        }
        params.distinguished_name = dn;

        let key_pair = KeyPair::generate().expect("key generation");
        let cert = params.self_signed(&key_pair).expect("self-signed certificate");

        Self {
            der: cert.der().to_vec(),
            pem: cert.pem(),
        }
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// PEM with BEGIN/END framing and line breaks.
    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// Unframed standard base64 of the DER bytes.
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.der)
    }

    /// Percent-encoded PEM, as some proxies forward it.
    pub fn url_encoded_pem(&self) -> String {
        urlencoding::encode(&self.pem).into_owned()
    }

    /// Parsed form.
    pub fn parsed(&self) -> ClientCertificate {
        ClientCertificate::from_der(&self.der).expect("generated certificate parses")
    }

    /// `x5t#S256` thumbprint.
    pub fn thumbprint(&self) -> String {
        self.parsed().thumbprint().to_string()
    }

    /// Subject DN as the authenticator sees it.
    pub fn subject_dn(&self) -> String {
        self.parsed().subject_dn().to_string()
    }

    /// The certificate as the TLS layer attaches it.
    pub fn as_attribute(&self) -> CertificateAttribute {
        CertificateAttribute::Chain(vec![self.der.clone()])
    }
}
