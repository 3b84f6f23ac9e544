//! # greenlight-auth
//!
//! Request authorization for Greenlight.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `token`: scoped bearer token issuance and authentication
//! - `authz`: authenticated, activated, and permission checks
//! - `limiter`: per-IP token bucket rate limiting with a background sweep

pub mod authz;
pub mod limiter;
pub mod password;
pub mod token;

pub use authz::PermissionAuthorizer;
pub use limiter::{RateLimiter, SweeperHandle};
pub use password::PasswordHasher;
pub use token::TokenAuthenticator;
