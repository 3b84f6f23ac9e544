//! Authentication configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest token lifetime accepted from configuration (ten years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Token lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authentication token TTL in hours.
    #[serde(default = "default_authentication_ttl")]
    pub authentication_token_ttl_hours: i64,
    /// Activation token TTL in hours.
    #[serde(default = "default_activation_ttl")]
    pub activation_token_ttl_hours: i64,
}

impl AuthConfig {
    /// Lifetime of tokens issued at login.
    pub fn authentication_ttl(&self) -> Duration {
        ttl_from_hours(self.authentication_token_ttl_hours)
    }

    /// Lifetime of tokens issued at registration.
    pub fn activation_ttl(&self) -> Duration {
        ttl_from_hours(self.activation_token_ttl_hours)
    }
}

// Out-of-range values are rejected by `AppConfig::validate`; clamping keeps
// an unvalidated config from panicking in chrono.
fn ttl_from_hours(hours: i64) -> Duration {
    Duration::hours(hours.clamp(0, MAX_TOKEN_TTL_HOURS))
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authentication_token_ttl_hours: default_authentication_ttl(),
            activation_token_ttl_hours: default_activation_ttl(),
        }
    }
}

fn default_authentication_ttl() -> i64 {
    24
}

fn default_activation_ttl() -> i64 {
    72
}
