//! Liveness endpoint.

/// Handler for GET /health
#[tracing::instrument(skip_all, name = "mtls.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}
