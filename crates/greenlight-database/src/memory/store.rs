//! In-process store implementing every storage trait.
//!
//! Honors the same contracts as the PostgreSQL repositories: unique email
//! addresses, scope- and expiry-filtered token lookups, and conditional
//! version-checked updates. All state sits behind one async mutex, so each
//! trait call is atomic with respect to the others.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;
use greenlight_entity::{
    Movie, NewMovie, NewUser, PermissionSet, TokenRecord, TokenScope, User, Versioned,
};

use crate::store::{MovieStore, PermissionStore, TokenStore, UserStore, VersionedStore};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tokens: Vec<TokenRecord>,
    permissions: HashMap<i64, HashSet<String>>,
    movies: BTreeMap<i64, Movie>,
    next_user_id: i64,
    next_movie_id: i64,
}

/// In-memory storage provider.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored token records (all scopes, live or expired).
    pub async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }

    /// Revokes a single permission code from a user.
    pub async fn remove_permission(&self, user_id: i64, code: &str) {
        let mut state = self.state.lock().await;
        if let Some(codes) = state.permissions.get_mut(&user_id) {
            codes.remove(code);
        }
    }
}

fn email_taken(state: &State, email: &str, except: Option<i64>) -> bool {
    state
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl VersionedStore<User> for MemoryStore {
    async fn get(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&id))
    }

    async fn update_if_version(
        &self,
        resource: &User,
        expected_version: i32,
    ) -> AppResult<Option<i32>> {
        let mut state = self.state.lock().await;
        match state.users.get(&resource.id) {
            Some(current) if current.version == expected_version => {}
            _ => return Ok(None),
        }
        if email_taken(&state, &resource.email, Some(resource.id)) {
            return Err(AppError::duplicate_email(
                "a user with this email address already exists",
            ));
        }

        let mut updated = resource.clone();
        updated.set_version(expected_version + 1);
        state.users.insert(updated.id, updated);
        Ok(Some(expected_version + 1))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.users.remove(&id).is_some();
        if removed {
            state.tokens.retain(|t| t.user_id != id);
            state.permissions.remove(&id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &NewUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if email_taken(&state, &user.email, None) {
            return Err(AppError::duplicate_email(
                "a user with this email address already exists",
            ));
        }

        state.next_user_id += 1;
        let created = User {
            id: state.next_user_id,
            created_at: Utc::now(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            activated: user.activated,
            version: 1,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_for_token(
        &self,
        scope: TokenScope,
        hash: &[u8; 32],
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        let owner = state
            .tokens
            .iter()
            .find(|t| &t.hash == hash && t.scope == scope && t.is_live(now))
            .map(|t| t.user_id);
        Ok(owner.and_then(|id| state.users.get(&id).cloned()))
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert(&self, token: &TokenRecord) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&token.user_id) {
            return Err(AppError::database(format!(
                "token owner {} does not exist",
                token.user_id
            )));
        }
        state.tokens.push(token.clone());
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: i64, scope: TokenScope) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.tokens.len();
        state
            .tokens
            .retain(|t| !(t.user_id == user_id && t.scope == scope));
        Ok((before - state.tokens.len()) as u64)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn all_for_user(&self, user_id: i64) -> AppResult<PermissionSet> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .get(&user_id)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let entry = state.permissions.entry(user_id).or_default();
        entry.extend(codes.iter().map(|c| c.to_string()));
        Ok(())
    }
}

#[async_trait]
impl VersionedStore<Movie> for MemoryStore {
    async fn get(&self, id: i64) -> AppResult<Option<Movie>> {
        Ok(self.state.lock().await.movies.get(&id).cloned())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().await.movies.contains_key(&id))
    }

    async fn update_if_version(
        &self,
        resource: &Movie,
        expected_version: i32,
    ) -> AppResult<Option<i32>> {
        let mut state = self.state.lock().await;
        let Some(current) = state.movies.get_mut(&resource.id) else {
            return Ok(None);
        };
        if current.version != expected_version {
            return Ok(None);
        }

        current.title = resource.title.clone();
        current.year = resource.year;
        current.runtime = resource.runtime;
        current.genres = resource.genres.clone();
        current.version = expected_version + 1;
        Ok(Some(current.version))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.state.lock().await.movies.remove(&id).is_some())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie> {
        let mut state = self.state.lock().await;
        state.next_movie_id += 1;
        let created = Movie {
            id: state.next_movie_id,
            created_at: Utc::now(),
            title: movie.title.clone(),
            year: movie.year,
            runtime: movie.runtime,
            genres: movie.genres.clone(),
            version: 1,
        };
        state.movies.insert(created.id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use greenlight_core::error::ErrorKind;
    use greenlight_entity::PasswordHash;

    fn new_user(email: &str) -> NewUser {
        NewUser::new("Test", email, PasswordHash::parse("$argon2id$stub").unwrap())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        UserStore::insert(&store, &new_user("a@example.com"))
            .await
            .unwrap();
        let err = UserStore::insert(&store, &new_user("a@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateEmail);
    }

    #[tokio::test]
    async fn test_token_lookup_respects_scope_and_expiry() {
        let store = MemoryStore::new();
        let user = UserStore::insert(&store, &new_user("b@example.com"))
            .await
            .unwrap();
        let now = Utc::now();
        let record = TokenRecord {
            hash: [9u8; 32],
            user_id: user.id,
            expiry: now + Duration::hours(1),
            scope: TokenScope::Activation,
        };
        TokenStore::insert(&store, &record).await.unwrap();

        let found = store
            .find_for_token(TokenScope::Activation, &[9u8; 32], now)
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let wrong_scope = store
            .find_for_token(TokenScope::Authentication, &[9u8; 32], now)
            .await
            .unwrap();
        assert!(wrong_scope.is_none());

        let expired = store
            .find_for_token(TokenScope::Activation, &[9u8; 32], now + Duration::hours(2))
            .await
            .unwrap();
        assert!(expired.is_none());
    }

    #[tokio::test]
    async fn test_delete_all_for_user_is_scoped() {
        let store = MemoryStore::new();
        let user = UserStore::insert(&store, &new_user("c@example.com"))
            .await
            .unwrap();
        let expiry = Utc::now() + Duration::hours(1);
        for (i, scope) in [
            TokenScope::Activation,
            TokenScope::Activation,
            TokenScope::Authentication,
        ]
        .into_iter()
        .enumerate()
        {
            let record = TokenRecord {
                hash: [i as u8; 32],
                user_id: user.id,
                expiry,
                scope,
            };
            TokenStore::insert(&store, &record).await.unwrap();
        }

        let removed = store
            .delete_all_for_user(user.id, TokenScope::Activation)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.token_count().await, 1);
    }

    #[tokio::test]
    async fn test_permissions_roundtrip() {
        let store = MemoryStore::new();
        store
            .add_for_user(1, &["movies:read", "movies:write"])
            .await
            .unwrap();
        let perms = store.all_for_user(1).await.unwrap();
        assert!(perms.includes("movies:write"));

        store.remove_permission(1, "movies:write").await;
        let perms = store.all_for_user(1).await.unwrap();
        assert!(!perms.includes("movies:write"));
        assert!(perms.includes("movies:read"));
        assert!(store.all_for_user(2).await.unwrap().is_empty());
    }
}
