//! HTTP routes for the mTLS client authentication service.
//!
//! Defines the Axum router and application state.

use crate::authenticator::ClientAuthenticator;
use crate::config::Config;
use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authenticator run for every client authentication request.
    pub authenticator: Arc<dyn ClientAuthenticator>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `POST /oauth2/client-auth` - authenticate the presenting client
/// - `GET /oauth2/client-auth/methods` - supported authentication methods
/// - `GET /health` - liveness
/// - `GET /metrics` - Prometheus scrape endpoint
/// - TraceLayer for request logging
/// - request timeout from configuration
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = state.config.request_timeout();

    let auth_routes = Router::new()
        .route("/oauth2/client-auth", post(handlers::authenticate_client))
        .route("/oauth2/client-auth/methods", get(handlers::supported_methods))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(auth_routes)
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
