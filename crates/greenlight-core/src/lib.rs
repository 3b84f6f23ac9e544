//! # greenlight-core
//!
//! Core crate for Greenlight. Contains configuration schemas, the unified
//! error system, and the clock abstraction shared by token expiry checks.
//!
//! This crate has **no** internal dependencies on other Greenlight crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
