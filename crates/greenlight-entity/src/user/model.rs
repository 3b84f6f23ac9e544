//! User entity model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::versioned::Versioned;

use super::password::PasswordHash;

/// A registered user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    #[sqlx(try_from = "String")]
    pub password_hash: PasswordHash,
    /// Whether the account has been activated.
    pub activated: bool,
    /// Optimistic concurrency version.
    pub version: i32,
}

impl Versioned for User {
    const RESOURCE: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }
}

/// Data required to create a new user.
///
/// The password hash is mandatory, so a user row can never be written
/// without one.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Pre-computed password hash.
    pub password_hash: PasswordHash,
    /// Initial activation state.
    pub activated: bool,
}

impl NewUser {
    /// Creates an inactive user record.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash,
            activated: false,
        }
    }
}
