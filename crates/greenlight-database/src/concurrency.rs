//! Optimistic concurrency control for version-stamped resources.
//!
//! There is no transaction spanning the read and the write. A caller loads a
//! resource, mutates it in memory, and submits it with the version it read.
//! The store applies the write only if that version is still current, so of
//! two writers that both read version N exactly one reaches N+1 and the
//! other receives `EditConflict`.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;
use greenlight_entity::Versioned;

use crate::bounded::bounded;
use crate::store::VersionedStore;

/// Applies the versioned write protocol against a store.
pub struct ConcurrencyGuard<S: ?Sized, T> {
    /// Backing store.
    store: Arc<S>,
    /// Deadline for each storage call.
    timeout: Duration,
    _resource: PhantomData<fn() -> T>,
}

impl<S: ?Sized, T> Clone for ConcurrencyGuard<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
            _resource: PhantomData,
        }
    }
}

impl<S: ?Sized, T> std::fmt::Debug for ConcurrencyGuard<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrencyGuard")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<S, T> ConcurrencyGuard<S, T>
where
    S: VersionedStore<T> + ?Sized,
    T: Versioned,
{
    /// Creates a guard over `store`.
    pub fn new(store: Arc<S>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            _resource: PhantomData,
        }
    }

    /// Loads a resource, failing with `NotFound` when it does not exist.
    pub async fn load(&self, id: i64) -> AppResult<T> {
        bounded(self.timeout, "load resource", self.store.get(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} {id} not found", T::RESOURCE)))
    }

    /// Writes `resource` if its version is still current.
    ///
    /// On success the new version (`old + 1`) is stored back into `resource`
    /// and returned. A zero-row update is classified with an existence
    /// check: a vanished id is `NotFound`, a stale version is `EditConflict`.
    pub async fn update(&self, resource: &mut T) -> AppResult<i32> {
        let id = resource.id();
        let expected = resource.version();

        let applied = bounded(
            self.timeout,
            "conditional update",
            self.store.update_if_version(resource, expected),
        )
        .await?;

        match applied {
            Some(version) => {
                resource.set_version(version);
                Ok(version)
            }
            None => {
                let exists =
                    bounded(self.timeout, "existence check", self.store.exists(id)).await?;
                if exists {
                    debug!(
                        resource = T::RESOURCE,
                        id,
                        expected_version = expected,
                        "Stale version rejected"
                    );
                    Err(AppError::edit_conflict(format!(
                        "{} {id} was modified by another request; re-read and retry",
                        T::RESOURCE
                    )))
                } else {
                    Err(AppError::not_found(format!("{} {id} not found", T::RESOURCE)))
                }
            }
        }
    }

    /// Deletes a resource, failing with `NotFound` when nothing was removed.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let deleted = bounded(self.timeout, "delete resource", self.store.delete(id)).await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::not_found(format!("{} {id} not found", T::RESOURCE)))
        }
    }
}
