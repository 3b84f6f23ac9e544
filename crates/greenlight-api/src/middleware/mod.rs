//! Axum middleware stack.
//!
//! Outermost first: panic recovery, request logging, CORS, rate limiting,
//! authentication, then per-route permission checks.

pub mod authenticate;
pub mod authorize;
pub mod cors;
pub mod logging;
pub mod panic;
pub mod rate_limit;
