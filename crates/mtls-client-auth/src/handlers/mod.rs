//! HTTP request handlers.

pub mod client_auth;
pub mod health;
pub mod metrics;

pub use client_auth::{authenticate_client, supported_methods};
pub use health::health_check;
pub use metrics::metrics_handler;
