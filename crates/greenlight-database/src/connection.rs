//! PostgreSQL pool for the Greenlight schema.
//!
//! `DatabasePool::open` sizes the pool from `DatabaseConfig`, pings it
//! under the per-call storage deadline, then brings the schema up to date
//! with the embedded `migrations/` set. The server does not start against
//! a database it cannot reach or migrate.

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use greenlight_core::config::DatabaseConfig;
use greenlight_core::error::{AppError, ErrorKind};
use greenlight_core::result::AppResult;

use crate::bounded::bounded;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connection pool over the users, tokens, permissions and movies tables.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect, verify and migrate.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Greenlight database unreachable: {e}"),
                    e,
                )
            })?;

        let db = Self { pool };
        bounded(config.query_timeout(), "database ping", db.ping()).await?;
        db.migrate().await?;

        info!(
            max_connections = config.max_connections,
            migrations = MIGRATOR.iter().count(),
            "Greenlight schema ready"
        );
        Ok(db)
    }

    /// Underlying sqlx pool handed to the repositories.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "database ping failed", e))
    }

    async fn migrate(&self) -> AppResult<()> {
        MIGRATOR.run(&self.pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Greenlight schema migration failed: {e}"),
                e,
            )
        })
    }

    /// Close every connection; in-flight queries finish first.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("database pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_options_follow_config() {
        let config = DatabaseConfig {
            max_connections: 10,
            min_connections: 2,
            connect_timeout_seconds: 7,
            idle_timeout_seconds: 600,
            ..DatabaseConfig::default()
        };
        let options = pool_options(&config);
        assert_eq!(options.get_max_connections(), 10);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(7));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_min_connections_never_exceed_max() {
        let config = DatabaseConfig {
            max_connections: 3,
            min_connections: 8,
            ..DatabaseConfig::default()
        };
        assert_eq!(pool_options(&config).get_min_connections(), 3);
    }

    #[test]
    fn test_embedded_migrations_create_schema_in_order() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert!(!versions.is_empty());
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
