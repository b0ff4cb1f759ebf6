//! Builders for JWKS documents.
//!
//! Only the members the authenticator reads are populated; `kty` is added so
//! documents look like real key sets.

use crate::cert_fixtures::TestCertificate;
use serde_json::{json, Value};

/// Builder for a `{"keys": [...]}` document.
///
/// # Example
/// ```rust,ignore
/// let body = KeySetBuilder::new()
///     .with_x5t(&other_cert)
///     .with_x5c(&client_cert)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct KeySetBuilder {
    keys: Vec<Value>,
}

impl KeySetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key publishing only the `x5t#S256` thumbprint of `cert`.
    pub fn with_x5t(mut self, cert: &TestCertificate) -> Self {
        self.keys.push(json!({
            "kty": "RSA",
            "x5t#S256": cert.thumbprint(),
        }));
        self
    }

    /// Key publishing `cert` as a one-element `x5c` chain.
    pub fn with_x5c(mut self, cert: &TestCertificate) -> Self {
        self.keys.push(json!({
            "kty": "RSA",
            "x5c": [cert.base64()],
        }));
        self
    }

    /// Key carrying both members, each for a possibly different certificate.
    pub fn with_x5t_and_x5c(mut self, x5t: &TestCertificate, x5c: &TestCertificate) -> Self {
        self.keys.push(json!({
            "kty": "RSA",
            "x5t#S256": x5t.thumbprint(),
            "x5c": [x5c.base64()],
        }));
        self
    }

    /// Arbitrary key entry.
    pub fn with_raw_key(mut self, key: Value) -> Self {
        self.keys.push(key);
        self
    }

    pub fn build_value(self) -> Value {
        json!({ "keys": self.keys })
    }

    pub fn build(self) -> String {
        self.build_value().to_string()
    }
}
