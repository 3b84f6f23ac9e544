//! Storage traits consumed by the auth core and handlers.
//!
//! Every backend (PostgreSQL, in-memory) implements the same contracts, in
//! particular the conditional update in [`VersionedStore::update_if_version`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use greenlight_core::result::AppResult;
use greenlight_entity::{
    Movie, NewMovie, NewUser, PermissionSet, TokenRecord, TokenScope, User, Versioned,
};

/// Version-stamped compare-and-swap storage for one resource type.
#[async_trait]
pub trait VersionedStore<T: Versioned>: Send + Sync + 'static {
    /// Loads a resource by id.
    async fn get(&self, id: i64) -> AppResult<Option<T>>;

    /// Whether a resource with this id exists.
    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Writes `resource` and bumps its version, but only if the stored
    /// version still equals `expected_version`.
    ///
    /// Returns the new version, or `None` when no row matched.
    async fn update_if_version(&self, resource: &T, expected_version: i32)
    -> AppResult<Option<i32>>;

    /// Deletes a resource. Returns `true` if a row was removed.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// User persistence.
#[async_trait]
pub trait UserStore: VersionedStore<User> {
    /// Inserts a new user. Fails with `DuplicateEmail` when the address is taken.
    async fn insert(&self, user: &NewUser) -> AppResult<User>;

    /// Finds a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Finds the owner of a live token with the given hash and scope.
    async fn find_for_token(
        &self,
        scope: TokenScope,
        hash: &[u8; 32],
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;
}

/// Token persistence. Only hashes are ever stored.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Persists a token record.
    async fn insert(&self, token: &TokenRecord) -> AppResult<()>;

    /// Deletes every token of `scope` owned by `user_id`. Returns the count removed.
    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> AppResult<u64>;
}

/// Permission grants.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Returns every permission code held by the user.
    async fn all_for_user(&self, user_id: i64) -> AppResult<PermissionSet>;

    /// Grants the listed codes to the user.
    async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> AppResult<()>;
}

/// Movie persistence.
#[async_trait]
pub trait MovieStore: VersionedStore<Movie> {
    /// Inserts a movie at version 1.
    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie>;
}
