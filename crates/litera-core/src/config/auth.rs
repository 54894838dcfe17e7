//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Must be at least 32 bytes.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Upper bound on the registration uniqueness-check join, in seconds.
    /// When the checks do not resolve in time the registration fails closed.
    #[serde(default = "default_uniqueness_timeout")]
    pub uniqueness_check_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_hours: default_token_ttl(),
            uniqueness_check_timeout_seconds: default_uniqueness_timeout(),
        }
    }
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_0123456789ABCDEF".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_uniqueness_timeout() -> u64 {
    5
}
