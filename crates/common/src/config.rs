//! Common configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connect timeout for outbound HTTP calls, in milliseconds.
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default read timeout for outbound HTTP calls, in milliseconds.
pub const DEFAULT_HTTP_READ_TIMEOUT_MS: u64 = 5_000;

/// Timeouts applied to outbound HTTP calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTimeouts {
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl HttpTimeouts {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_HTTP_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_HTTP_READ_TIMEOUT_MS,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enable JSON-formatted logs
    pub json_logs: bool,
}
