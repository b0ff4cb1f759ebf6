//! Fixed test identifiers.

// Client IDs
pub const TEST_CLIENT_ID: &str = "payments-api";
pub const TEST_CLIENT_ID_JWKS: &str = "partner-gateway";
pub const TEST_CLIENT_ID_UNKNOWN: &str = "unregistered-client";

// Tenants
pub const TEST_TENANT: &str = "example.com";

// Certificate subjects
pub const TEST_SUBJECT_CN: &str = "payments-api";
pub const TEST_OTHER_SUBJECT_CN: &str = "someone-else";

// Forwarding header
pub const TEST_CERT_HEADER: &str = "x-ssl-client-cert";

// JWKS endpoint path on the mock server
pub const TEST_JWKS_PATH: &str = "/oauth2/jwks";
