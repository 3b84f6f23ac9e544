//! Per-IP rate limiter.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use greenlight_core::config::LimiterConfig;

use super::bucket::TokenBucket;
use super::sweeper::{self, SweeperHandle};

/// Limiter state for one client address.
#[derive(Debug)]
struct ClientState {
    bucket: TokenBucket,
    last_seen: Instant,
}

#[derive(Debug)]
pub(crate) struct Inner {
    config: LimiterConfig,
    clients: Mutex<HashMap<IpAddr, ClientState>>,
}

/// In-memory token bucket limiter keyed by client IP.
///
/// Entries are created on first contact and only removed by [`sweep`],
/// which evicts clients idle for longer than the configured window.
///
/// [`sweep`]: RateLimiter::sweep
#[derive(Debug, Clone)]
pub struct RateLimiter {
    pub(crate) inner: Arc<Inner>,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(config: LimiterConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                clients: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Whether limiting is switched on.
    pub fn enabled(&self) -> bool {
        self.inner.config.enabled
    }

    /// Attempts to admit one request from `ip`.
    pub async fn allow(&self, ip: IpAddr) -> bool {
        if !self.inner.config.enabled {
            return true;
        }

        let config = &self.inner.config;
        let now = Instant::now();
        let mut clients = self.inner.clients.lock().await;

        let client = clients.entry(ip).or_insert_with(|| ClientState {
            bucket: TokenBucket::full(config.burst, now),
            last_seen: now,
        });
        client.last_seen = now;
        client
            .bucket
            .try_take(config.burst, config.requests_per_second, now)
    }

    /// Removes every client idle longer than the eviction window.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        let idle = self.inner.config.idle_timeout();
        let now = Instant::now();
        let mut clients = self.inner.clients.lock().await;

        let before = clients.len();
        clients.retain(|_, client| now.duration_since(client.last_seen) <= idle);
        let removed = before - clients.len();

        debug!(removed, remaining = clients.len(), "Rate limiter sweep");
        removed
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.inner.clients.lock().await.len()
    }

    /// Spawns the periodic idle-client sweep.
    pub fn start_sweeper(&self) -> SweeperHandle {
        sweeper::spawn(self.clone(), self.inner.config.sweep_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, last))
    }

    fn limiter(rps: f64, burst: u32) -> RateLimiter {
        RateLimiter::new(LimiterConfig {
            requests_per_second: rps,
            burst,
            ..LimiterConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_rate() {
        let limiter = limiter(2.0, 4);
        for _ in 0..4 {
            assert!(limiter.allow(ip(1)).await);
        }
        assert!(!limiter.allow(ip(1)).await);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(limiter.allow(ip(1)).await);
        assert!(!limiter.allow(ip(1)).await);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(limiter.allow(ip(1)).await);
        assert!(limiter.allow(ip(1)).await);
        assert!(!limiter.allow(ip(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clients_are_independent() {
        let limiter = limiter(1.0, 1);
        assert!(limiter.allow(ip(1)).await);
        assert!(!limiter.allow(ip(1)).await);
        assert!(limiter.allow(ip(2)).await);
        assert_eq!(limiter.tracked_clients().await, 2);
    }

    #[tokio::test]
    async fn test_disabled_admits_everything() {
        let limiter = RateLimiter::new(LimiterConfig {
            enabled: false,
            burst: 1,
            ..LimiterConfig::default()
        });
        for _ in 0..100 {
            assert!(limiter.allow(ip(1)).await);
        }
        assert_eq!(limiter.tracked_clients().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_evicts_idle_clients() {
        let limiter = limiter(2.0, 4);
        for i in 0..3 {
            limiter.allow(ip(i)).await;
        }
        assert_eq!(limiter.tracked_clients().await, 3);

        tokio::time::advance(Duration::from_secs(120)).await;
        limiter.allow(ip(0)).await;
        assert_eq!(limiter.sweep().await, 0);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(limiter.sweep().await, 2);
        assert_eq!(limiter.tracked_clients().await, 1);

        tokio::time::advance(Duration::from_secs(181)).await;
        assert_eq!(limiter.sweep().await, 1);
        assert_eq!(limiter.tracked_clients().await, 0);
    }
}
