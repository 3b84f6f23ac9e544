//! Permission repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use greenlight_core::error::{AppError, ErrorKind};
use greenlight_core::result::AppResult;
use greenlight_entity::PermissionSet;

use crate::store::PermissionStore;

/// Repository for user permission grants.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn all_for_user(&self, user_id: i64) -> AppResult<PermissionSet> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT permissions.code \
             FROM permissions \
             INNER JOIN users_permissions ON users_permissions.permission_id = permissions.id \
             WHERE users_permissions.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load user permissions", e)
        })?;

        Ok(codes.into_iter().collect())
    }

    async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> AppResult<()> {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        sqlx::query(
            "INSERT INTO users_permissions (user_id, permission_id) \
             SELECT $1, permissions.id FROM permissions WHERE permissions.code = ANY($2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(&codes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant permissions", e))?;
        Ok(())
    }
}
