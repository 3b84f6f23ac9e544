//! Scoped, expiring bearer tokens.

pub mod authenticator;
pub mod generator;

pub use authenticator::TokenAuthenticator;
pub use generator::{TOKEN_LENGTH, hash_plaintext, validate_plaintext};
