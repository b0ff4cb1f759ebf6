//! # mTLS Test Utilities
//!
//! Shared test utilities for the mTLS client authentication crate.
//!
//! This crate provides:
//! - Certificate fixtures generated at test time (`TestCertificate`)
//! - Key-set builders (`KeySetBuilder`)
//! - A call-counting client registry (`MockClientRegistry`)
//! - A wiremock-backed JWKS endpoint (`MockJwksServer`)
//! - A router harness for HTTP-level tests (`TestAuthService`)
//! - Fixed test identifiers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mtls_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let cert = TestCertificate::generate("payments-api");
//!     let jwks = MockJwksServer::start().await;
//!     jwks.serve_key_set(&KeySetBuilder::new().with_x5c(&cert).build(), 1).await;
//!
//!     let registry = MockClientRegistry::new()
//!         .with_jwks_client(TEST_CLIENT_ID, &jwks.url());
//! }
//! ```

pub mod assertions;
pub mod cert_fixtures;
pub mod jwks_server;
pub mod key_set_builders;
pub mod mock_registry;
pub mod service_harness;
pub mod test_ids;

// Re-export commonly used items
pub use assertions::*;
pub use cert_fixtures::*;
pub use jwks_server::*;
pub use key_set_builders::*;
pub use mock_registry::*;
pub use service_harness::*;
pub use test_ids::*;
