//! mTLS client authentication service configuration.
//!
//! Configuration is loaded from environment variables. No secrets are
//! held, so `Debug` prints every field.

use crate::authenticator::MutualTlsConfig;
use crate::jwks::DEFAULT_MAX_RESPONSE_BYTES;
use common::config::{
    HttpTimeouts, ObservabilityConfig, DEFAULT_HTTP_CONNECT_TIMEOUT_MS,
    DEFAULT_HTTP_READ_TIMEOUT_MS,
};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8443";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "mtls_client_auth=debug,tower_http=debug";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8443").
    pub bind_address: String,

    /// Header a trusted proxy forwards the client certificate in.
    /// Unset disables the header source.
    pub mtls_auth_header: Option<String>,

    /// Connect/read timeouts for JWKS fetches.
    pub jwks_http_timeouts: HttpTimeouts,

    /// Largest JWKS document accepted, in bytes.
    pub jwks_max_response_bytes: usize,

    /// JWKS cache lifetime; `None` caches for the process lifetime.
    pub jwks_cache_ttl_seconds: Option<u64>,

    /// JSON file with registered clients.
    pub client_registry_path: Option<PathBuf>,

    /// Timeout applied to every HTTP request.
    pub request_timeout_seconds: u64,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),

    #[error("Invalid JWKS configuration: {0}")]
    InvalidJwks(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let mtls_auth_header = non_blank(vars, "MTLS_AUTH_HEADER");

        let connect_timeout_ms = parse_positive(
            vars,
            "JWKS_HTTP_CONNECT_TIMEOUT_MS",
            DEFAULT_HTTP_CONNECT_TIMEOUT_MS,
            ConfigError::InvalidTimeout,
        )?;
        let read_timeout_ms = parse_positive(
            vars,
            "JWKS_HTTP_READ_TIMEOUT_MS",
            DEFAULT_HTTP_READ_TIMEOUT_MS,
            ConfigError::InvalidTimeout,
        )?;

        let jwks_max_response_bytes = parse_positive(
            vars,
            "JWKS_MAX_RESPONSE_BYTES",
            DEFAULT_MAX_RESPONSE_BYTES,
            ConfigError::InvalidJwks,
        )?;

        let jwks_cache_ttl_seconds = if vars.contains_key("JWKS_CACHE_TTL_SECONDS") {
            Some(parse_positive(
                vars,
                "JWKS_CACHE_TTL_SECONDS",
                0,
                ConfigError::InvalidJwks,
            )?)
        } else {
            None
        };

        let client_registry_path = non_blank(vars, "CLIENT_REGISTRY_PATH").map(PathBuf::from);

        let request_timeout_seconds = parse_positive(
            vars,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
            ConfigError::InvalidTimeout,
        )?;

        let json_logs = match vars.get("LOG_FORMAT").map(|v| v.trim().to_ascii_lowercase()) {
            None => false,
            Some(format) if format == "json" => true,
            Some(format) if format == "text" => false,
            Some(other) => {
                return Err(ConfigError::InvalidLogging(format!(
                    "LOG_FORMAT must be 'json' or 'text', got '{}'",
                    other
                )))
            }
        };

        let observability = ObservabilityConfig {
            log_level: vars
                .get("LOG_LEVEL")
                .cloned()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            json_logs,
        };

        Ok(Config {
            bind_address,
            mtls_auth_header,
            jwks_http_timeouts: HttpTimeouts {
                connect_timeout_ms,
                read_timeout_ms,
            },
            jwks_max_response_bytes,
            jwks_cache_ttl_seconds,
            client_registry_path,
            request_timeout_seconds,
            observability,
        })
    }

    /// The subset of settings the authenticator needs.
    pub fn mutual_tls(&self) -> MutualTlsConfig {
        MutualTlsConfig {
            auth_header: self.mtls_auth_header.clone(),
            jwks_timeouts: self.jwks_http_timeouts,
            jwks_max_response_bytes: self.jwks_max_response_bytes,
            jwks_cache_ttl: self.jwks_cache_ttl_seconds.map(Duration::from_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn non_blank(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parse `name` as an integer greater than zero, or return `default`.
fn parse_positive<T>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
    error: fn(String) -> ConfigError,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: T = value_str.trim().parse().map_err(|e| {
        error(format!(
            "{} must be a valid positive integer, got '{}': {}",
            name, value_str, e
        ))
    })?;

    if value == T::default() {
        return Err(error(format!("{} must be greater than 0", name)));
    }

    Ok(value)
}
