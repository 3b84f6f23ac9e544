//! Bearer token issuance and verification.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as TokenTtl;
use tracing::debug;

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;
use greenlight_core::traits::Clock;
use greenlight_database::bounded;
use greenlight_database::store::{TokenStore, UserStore};
use greenlight_entity::{Principal, Token, TokenScope, User};

use super::generator::{hash_plaintext, new_token, validate_plaintext};

/// Issues scoped tokens and resolves bearer headers to principals.
#[derive(Clone)]
pub struct TokenAuthenticator {
    /// Token owners.
    users: Arc<dyn UserStore>,
    /// Hashed token records.
    tokens: Arc<dyn TokenStore>,
    /// Time source for expiry.
    clock: Arc<dyn Clock>,
    /// Deadline for each storage call.
    timeout: Duration,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TokenAuthenticator {
    /// Creates a new authenticator.
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            clock,
            timeout,
        }
    }

    /// Issues a token for `user_id` valid for `ttl`, persisting only its hash.
    ///
    /// The returned [`Token`] is the only place the plaintext ever exists.
    pub async fn generate_token(
        &self,
        user_id: i64,
        ttl: TokenTtl,
        scope: TokenScope,
    ) -> AppResult<Token> {
        let token = new_token(user_id, self.clock.now() + ttl, scope);
        bounded(
            self.timeout,
            "insert token",
            self.tokens.insert(&token.record()),
        )
        .await?;

        debug!(user_id, scope = %scope, expiry = %token.expiry, "Issued token");
        Ok(token)
    }

    /// Resolves an `Authorization` header value to a principal.
    ///
    /// A missing header is the anonymous principal. A header that is not
    /// exactly `Bearer <token>` is `MalformedAuthHeader`; a plaintext of the
    /// wrong length is `Validation`; an unknown, expired, or wrong-scope
    /// token is `InvalidToken`.
    pub async fn authenticate(&self, header: Option<&str>) -> AppResult<Principal> {
        let Some(header) = header else {
            return Ok(Principal::Anonymous);
        };

        let parts: Vec<&str> = header.split(' ').collect();
        let plaintext = match parts.as_slice() {
            ["Bearer", plaintext] => *plaintext,
            _ => {
                return Err(AppError::malformed_auth_header(
                    "invalid or missing authentication token",
                ));
            }
        };

        let user = self
            .user_for_token(TokenScope::Authentication, plaintext)
            .await?;
        Ok(Principal::Authenticated(user))
    }

    /// Returns the owner of a live token with the given scope.
    pub async fn user_for_token(&self, scope: TokenScope, plaintext: &str) -> AppResult<User> {
        validate_plaintext(plaintext)?;

        let hash = hash_plaintext(plaintext);
        let now = self.clock.now();
        bounded(
            self.timeout,
            "find user for token",
            self.users.find_for_token(scope, &hash, now),
        )
        .await?
        .ok_or_else(|| AppError::invalid_token("invalid or expired token"))
    }

    /// Deletes every token of `scope` held by `user_id`.
    pub async fn revoke_all_for_user(&self, user_id: i64, scope: TokenScope) -> AppResult<u64> {
        let removed = bounded(
            self.timeout,
            "delete tokens",
            self.tokens.delete_all_for_user(user_id, scope),
        )
        .await?;

        debug!(user_id, scope = %scope, removed, "Revoked tokens");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use greenlight_core::error::ErrorKind;
    use greenlight_core::traits::ManualClock;
    use greenlight_database::MemoryStore;
    use greenlight_database::store::VersionedStore;
    use greenlight_entity::{NewUser, PasswordHash, TokenRecord};

    const TIMEOUT: Duration = Duration::from_secs(3);

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        auth: TokenAuthenticator,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let auth = TokenAuthenticator::new(store.clone(), store.clone(), clock.clone(), TIMEOUT);
        Fixture { store, clock, auth }
    }

    async fn seed_users(store: &MemoryStore, count: usize) -> User {
        let mut last = None;
        for i in 0..count {
            let hash = PasswordHash::parse("$argon2id$stub").unwrap();
            let user = UserStore::insert(
                store,
                &NewUser::new("User", format!("user{i}@example.com"), hash),
            )
            .await
            .unwrap();
            last = Some(user);
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_token_expires_after_ttl() {
        let fx = fixture();
        let user = seed_users(&fx.store, 7).await;
        assert_eq!(user.id, 7);

        let token = fx
            .auth
            .generate_token(7, TokenTtl::hours(24), TokenScope::Authentication)
            .await
            .unwrap();
        assert_eq!(token.plaintext.len(), 26);

        let header = format!("Bearer {}", token.plaintext);
        let principal = fx.auth.authenticate(Some(&header)).await.unwrap();
        assert_eq!(principal.user().map(|u| u.id), Some(7));

        fx.clock.advance(TokenTtl::hours(25));
        let err = fx.auth.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let fx = fixture();
        let principal = fx.auth.authenticate(None).await.unwrap();
        assert!(principal.is_anonymous());
    }

    #[tokio::test]
    async fn test_malformed_headers() {
        let fx = fixture();
        for header in [
            "",
            "Bearer",
            "Basic ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            "bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            "Bearer  ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            "Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ extra",
        ] {
            let err = fx.auth.authenticate(Some(header)).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedAuthHeader, "header {header:?}");
        }
    }

    #[tokio::test]
    async fn test_wrong_length_is_validation() {
        let fx = fixture();
        let err = fx.auth.authenticate(Some("Bearer SHORT")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_token_is_invalid() {
        let fx = fixture();
        let err = fx
            .auth
            .authenticate(Some("Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[tokio::test]
    async fn test_scope_is_enforced() {
        let fx = fixture();
        let user = seed_users(&fx.store, 1).await;
        let activation = fx
            .auth
            .generate_token(user.id, TokenTtl::days(3), TokenScope::Activation)
            .await
            .unwrap();

        let header = format!("Bearer {}", activation.plaintext);
        let err = fx.auth.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);

        let owner = fx
            .auth
            .user_for_token(TokenScope::Activation, &activation.plaintext)
            .await
            .unwrap();
        assert_eq!(owner.id, user.id);
    }

    #[tokio::test]
    async fn test_revoke_all_for_user() {
        let fx = fixture();
        let user = seed_users(&fx.store, 1).await;
        let mut plaintexts = Vec::new();
        for _ in 0..3 {
            let token = fx
                .auth
                .generate_token(user.id, TokenTtl::days(3), TokenScope::Activation)
                .await
                .unwrap();
            plaintexts.push(token.plaintext);
        }

        let removed = fx
            .auth
            .revoke_all_for_user(user.id, TokenScope::Activation)
            .await
            .unwrap();
        assert_eq!(removed, 3);
        for plaintext in &plaintexts {
            let err = fx
                .auth
                .user_for_token(TokenScope::Activation, plaintext)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidToken);
        }
    }

    /// Store whose lookups never finish in time.
    struct StalledStore;

    #[async_trait]
    impl VersionedStore<User> for StalledStore {
        async fn get(&self, _id: i64) -> AppResult<Option<User>> {
            Ok(None)
        }

        async fn exists(&self, _id: i64) -> AppResult<bool> {
            Ok(false)
        }

        async fn update_if_version(&self, _user: &User, _expected: i32) -> AppResult<Option<i32>> {
            Ok(None)
        }

        async fn delete(&self, _id: i64) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[async_trait]
    impl UserStore for StalledStore {
        async fn insert(&self, _user: &NewUser) -> AppResult<User> {
            Err(AppError::internal("unused"))
        }

        async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            Ok(None)
        }

        async fn find_for_token(
            &self,
            _scope: TokenScope,
            _hash: &[u8; 32],
            _now: DateTime<Utc>,
        ) -> AppResult<Option<User>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    #[async_trait]
    impl TokenStore for StalledStore {
        async fn insert(&self, _token: &TokenRecord) -> AppResult<()> {
            Ok(())
        }

        async fn delete_all_for_user(&self, _user_id: i64, _scope: TokenScope) -> AppResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_timeout_is_not_auth_failure() {
        let store = Arc::new(StalledStore);
        let auth = TokenAuthenticator::new(
            store.clone(),
            store,
            Arc::new(ManualClock::default()),
            TIMEOUT,
        );
        let err = auth
            .authenticate(Some("Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageTimeout);
    }
}
