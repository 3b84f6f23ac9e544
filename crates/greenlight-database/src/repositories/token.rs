//! Token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use greenlight_core::error::{AppError, ErrorKind};
use greenlight_core::result::AppResult;
use greenlight_entity::{TokenRecord, TokenScope};

use crate::store::TokenStore;

/// Repository for hashed token records.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn insert(&self, token: &TokenRecord) -> AppResult<()> {
        sqlx::query("INSERT INTO tokens (hash, user_id, expiry, scope) VALUES ($1, $2, $3, $4)")
            .bind(&token.hash[..])
            .bind(token.user_id)
            .bind(token.expiry)
            .bind(token.scope.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert token", e))?;
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1 AND scope = $2")
            .bind(user_id)
            .bind(scope.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete user tokens", e)
            })?;
        Ok(result.rows_affected())
    }
}
