//! mTLS Client Authentication Library
//!
//! Authenticates OAuth 2.0 clients at the token endpoint by the X.509
//! certificate they present over mutual TLS (RFC 8705), against either a
//! statically registered certificate or a certificate published in the
//! client's JWKS.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> authenticator -> certificate, jwks, registry
//! ```
//!
//! # Modules
//!
//! - `authenticator` - client authenticator contract and the mTLS authenticator
//! - `certificate` - certificate decoding and thumbprint comparison
//! - `jwks` - JWKS cache, fetcher and key-set matcher
//! - `registry` - client registration lookup
//! - `config` - Service configuration from environment
//! - `errors` - Error types with OAuth error code mapping
//! - `handlers` - HTTP request handlers
//! - `observability` - metrics and log-safe correlation hashing
//! - `routes` - Axum router setup

pub mod authenticator;
pub mod certificate;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod jwks;
pub mod observability;
pub mod registry;
pub mod routes;
