//! mTLS Client Authentication Service
//!
//! Serves the mutual TLS client authentication step of an OAuth 2.0
//! token endpoint behind a TLS-terminating proxy.

use mtls_client_auth::authenticator::MutualTlsAuthenticator;
use mtls_client_auth::config::Config;
use mtls_client_auth::observability::metrics::init_metrics_recorder;
use mtls_client_auth::registry::InMemoryClientRegistry;
use mtls_client_auth::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_level.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting mTLS client authentication service");
    info!(
        bind_address = %config.bind_address,
        mtls_auth_header = ?config.mtls_auth_header,
        jwks_connect_timeout_ms = config.jwks_http_timeouts.connect_timeout_ms,
        jwks_read_timeout_ms = config.jwks_http_timeouts.read_timeout_ms,
        jwks_cache_ttl_seconds = ?config.jwks_cache_ttl_seconds,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let client_registry = match &config.client_registry_path {
        Some(path) => {
            let registry = InMemoryClientRegistry::from_file(path).map_err(|e| {
                error!("Failed to load client registry: {}", e);
                e
            })?;
            info!(clients = registry.len(), path = %path.display(), "Client registry loaded");
            registry
        }
        None => {
            warn!("CLIENT_REGISTRY_PATH not set, no clients are registered");
            InMemoryClientRegistry::new()
        }
    };

    let authenticator = MutualTlsAuthenticator::from_config(&config.mutual_tls(), Arc::new(client_registry))
        .map_err(|e| {
            error!("Failed to build authenticator: {}", e);
            e
        })?;

    let bind_address = config.bind_address.clone();

    let state = Arc::new(AppState {
        authenticator: Arc::new(authenticator),
        config,
    });

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("mTLS client authentication service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("mTLS client authentication service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
