//! Per-client token bucket admission control.

pub mod bucket;
pub mod rate_limiter;
pub mod sweeper;

pub use rate_limiter::RateLimiter;
pub use sweeper::SweeperHandle;
