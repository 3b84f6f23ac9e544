//! Rate limiter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-client token bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// When false every request is admitted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Sustained refill rate, in requests per second.
    #[serde(default = "default_rps")]
    pub requests_per_second: f64,
    /// Bucket capacity.
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// How often the idle-client sweep runs, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// A client idle for this many sweep intervals is evicted.
    #[serde(default = "default_idle_multiplier")]
    pub idle_multiplier: u32,
}

impl LimiterConfig {
    /// Returns the sweep period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Returns the idle time after which a client entry is evicted.
    pub fn idle_timeout(&self) -> Duration {
        self.sweep_interval() * self.idle_multiplier
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_second: default_rps(),
            burst: default_burst(),
            sweep_interval_seconds: default_sweep_interval(),
            idle_multiplier: default_idle_multiplier(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_rps() -> f64 {
    2.0
}

fn default_burst() -> u32 {
    5
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_idle_multiplier() -> u32 {
    3
}
