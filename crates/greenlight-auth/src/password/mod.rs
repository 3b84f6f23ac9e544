//! Password hashing and verification.

pub mod hasher;

pub use hasher::{MAX_PASSWORD_BYTES, PasswordHasher};
