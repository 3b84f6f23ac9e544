//! Store set that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use greenlight_core::config::DatabaseConfig;
use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    MovieRepository, PermissionRepository, TokenRepository, UserRepository,
};
use crate::store::{MovieStore, PermissionStore, TokenStore, UserStore};

/// Every store the application needs, backed by a single provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Clone)]
pub struct Stores {
    /// User accounts.
    pub users: Arc<dyn UserStore>,
    /// Hashed token records.
    pub tokens: Arc<dyn TokenStore>,
    /// Permission grants.
    pub permissions: Arc<dyn PermissionStore>,
    /// Movie resources.
    pub movies: Arc<dyn MovieStore>,
    /// Connection pool, present only for the postgres provider.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the store set described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store provider");
                let db = DatabasePool::open(config).await?;
                let pool = db.pool().clone();
                Ok(Self {
                    users: Arc::new(UserRepository::new(pool.clone())),
                    tokens: Arc::new(TokenRepository::new(pool.clone())),
                    permissions: Arc::new(PermissionRepository::new(pool.clone())),
                    movies: Arc::new(MovieRepository::new(pool)),
                    pool: Some(db),
                })
            }
            "memory" => {
                info!("Initializing in-memory store provider");
                Ok(Self::memory(Arc::new(MemoryStore::new())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Build a store set over one shared in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            tokens: store.clone(),
            permissions: store.clone(),
            movies: store,
            pool: None,
        }
    }

    /// Release the connection pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenlight_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_shares_state() {
        let config = DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        };
        let stores = Stores::connect(&config).await.unwrap();
        assert!(stores.pool.is_none());

        stores.permissions.add_for_user(7, &["movies:read"]).await.unwrap();
        assert!(stores.permissions.all_for_user(7).await.unwrap().includes("movies:read"));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = DatabaseConfig {
            provider: "sqlite".to_string(),
            ..DatabaseConfig::default()
        };
        let err = Stores::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
