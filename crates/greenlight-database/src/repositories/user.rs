//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use greenlight_core::error::{AppError, ErrorKind};
use greenlight_core::result::AppResult;
use greenlight_entity::{NewUser, TokenScope, User};

use super::is_unique_violation;
use crate::store::{UserStore, VersionedStore};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Repository for user persistence and token-owner lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    if is_unique_violation(&e, EMAIL_CONSTRAINT) {
        AppError::duplicate_email("a user with this email address already exists")
    } else {
        AppError::with_source(ErrorKind::Database, context, e)
    }
}

#[async_trait]
impl VersionedStore<User> for UserRepository {
    async fn get(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, created_at, name, email, password_hash, activated, version \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check user existence", e)
            })
    }

    async fn update_if_version(
        &self,
        resource: &User,
        expected_version: i32,
    ) -> AppResult<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE users \
             SET name = $1, email = $2, password_hash = $3, activated = $4, version = version + 1 \
             WHERE id = $5 AND version = $6 \
             RETURNING version",
        )
        .bind(&resource.name)
        .bind(&resource.email)
        .bind(resource.password_hash.as_str())
        .bind(resource.activated)
        .bind(resource.id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, activated) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, created_at, name, email, password_hash, activated, version",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(user.activated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, created_at, name, email, password_hash, activated, version \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
        })
    }

    async fn find_for_token(
        &self,
        scope: TokenScope,
        hash: &[u8; 32],
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT users.id, users.created_at, users.name, users.email, users.password_hash, \
                    users.activated, users.version \
             FROM users \
             INNER JOIN tokens ON users.id = tokens.user_id \
             WHERE tokens.hash = $1 AND tokens.scope = $2 AND tokens.expiry > $3",
        )
        .bind(&hash[..])
        .bind(scope.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user for token", e)
        })
    }
}
