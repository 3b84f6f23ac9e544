//! Stored password hash value object.

use std::fmt;

use greenlight_core::error::AppError;

/// An immutable PHC-format password hash.
///
/// Holds only the derived hash, never the plaintext it was computed from.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash, rejecting an empty value.
    pub fn parse(encoded: impl Into<String>) -> Result<Self, AppError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(AppError::internal("missing password hash for user"));
        }
        Ok(Self(encoded))
    }

    /// Returns the encoded hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
