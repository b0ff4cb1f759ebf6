//! Common utilities and types shared across the mTLS client authentication crates.

#![warn(clippy::pedantic)]

/// Module for OAuth 2.0 error codes
pub mod error;

/// Module for common identifier types
pub mod types;

/// Module for common configuration
pub mod config;
