//! Metrics definitions for mTLS client authentication.
//!
//! All metrics follow Prometheus naming conventions:
//! - `mtls_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `outcome`: 3 values (authenticated, rejected, errored)
//! - `cache_status`: 2 values (hit, miss)
//! - `status`: 2 values (success, error)
//! - `error_code`: bounded by `OAuthErrorCode`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by
/// the `/metrics` route.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Client authentication: local work plus an occasional JWKS fetch
        .set_buckets_for_metric(
            Matcher::Full("mtls_client_auth_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set client auth buckets: {e}"))?
        // JWKS fetches are bounded by the HTTP connect + read timeouts
        .set_buckets_for_metric(
            Matcher::Full("mtls_jwks_fetch_duration_seconds".to_string()),
            &[0.010, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000],
        )
        .map_err(|e| format!("Failed to set JWKS fetch buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

// ============================================================================
// Client Authentication Metrics
// ============================================================================

/// Record a client authentication attempt.
///
/// Metric: `mtls_client_auth_total`, `mtls_client_auth_duration_seconds`
/// Labels: `outcome` (authenticated, rejected, errored)
pub fn record_client_auth(outcome: &str, duration: Duration) {
    histogram!("mtls_client_auth_duration_seconds", "outcome" => outcome.to_string())
        .record(duration.as_secs_f64());

    counter!("mtls_client_auth_total", "outcome" => outcome.to_string()).increment(1);
}

// ============================================================================
// JWKS Metrics
// ============================================================================

/// Record a JWKS cache lookup.
///
/// Metric: `mtls_jwks_cache_requests_total`
/// Labels: `cache_status` (hit, miss)
pub fn record_jwks_cache_request(cache_status: &str) {
    counter!("mtls_jwks_cache_requests_total", "cache_status" => cache_status.to_string())
        .increment(1);
}

/// Record a remote JWKS fetch.
///
/// Metric: `mtls_jwks_fetch_total`, `mtls_jwks_fetch_duration_seconds`
/// Labels: `status` (success, error)
pub fn record_jwks_fetch(status: &str, duration: Duration) {
    histogram!("mtls_jwks_fetch_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("mtls_jwks_fetch_total", "status" => status.to_string()).increment(1);
}

// ============================================================================
// Error Metrics
// ============================================================================

/// Record a fatal authentication error.
///
/// Metric: `mtls_errors_total`
/// Labels: `error_code`, `status_code`
pub fn record_error(error_code: &str, status_code: u16) {
    counter!("mtls_errors_total",
        "error_code" => error_code.to_string(),
        "status_code" => status_code.to_string()
    )
    .increment(1);
}
