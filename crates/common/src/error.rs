//! OAuth 2.0 error codes (RFC 6749 §5.2).
//!
//! Client authenticators surface failures as one of these codes so the
//! token endpoint can render a protocol-level error response without
//! knowing which authenticator produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes a client authentication failure may be reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthErrorCode {
    /// Client authentication failed (unknown client, bad credentials).
    InvalidClient,
    /// Unexpected condition on the authorization server.
    ServerError,
}

impl OAuthErrorCode {
    /// Wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthErrorCode::InvalidClient => "invalid_client",
            OAuthErrorCode::ServerError => "server_error",
        }
    }

    /// Whether the code describes a fault on the server side.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        matches!(self, OAuthErrorCode::ServerError)
    }
}

impl fmt::Display for OAuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
