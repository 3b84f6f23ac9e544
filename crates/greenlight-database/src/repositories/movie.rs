//! Movie repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use greenlight_core::error::{AppError, ErrorKind};
use greenlight_core::result::AppResult;
use greenlight_entity::{Movie, NewMovie};

use crate::store::{MovieStore, VersionedStore};

/// Repository for movie rows.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionedStore<Movie> for MovieRepository {
    async fn get(&self, id: i64) -> AppResult<Option<Movie>> {
        sqlx::query_as::<_, Movie>(
            "SELECT id, created_at, title, year, runtime, genres, version FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find movie", e))
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check movie existence", e)
            })
    }

    async fn update_if_version(
        &self,
        resource: &Movie,
        expected_version: i32,
    ) -> AppResult<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE movies \
             SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1 \
             WHERE id = $5 AND version = $6 \
             RETURNING version",
        )
        .bind(&resource.title)
        .bind(resource.year)
        .bind(resource.runtime)
        .bind(&resource.genres)
        .bind(resource.id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update movie", e))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete movie", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie> {
        sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, year, runtime, genres) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, created_at, title, year, runtime, genres, version",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.runtime)
        .bind(&movie.genres)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create movie", e))
    }
}
