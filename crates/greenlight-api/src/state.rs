//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use greenlight_auth::{PasswordHasher, PermissionAuthorizer, RateLimiter, TokenAuthenticator};
use greenlight_core::config::AppConfig;
use greenlight_core::traits::Clock;
use greenlight_database::store::{MovieStore, UserStore};
use greenlight_database::{ConcurrencyGuard, Stores};
use greenlight_entity::{Movie, User};

use crate::background::BackgroundTasks;
use crate::notifier::Notifier;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-backed for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Storage backends
    pub stores: Stores,
    /// Detached work started by handlers
    pub background: BackgroundTasks,
    /// Account notification delivery
    pub notifier: Arc<dyn Notifier>,

    // ── Auth ─────────────────────────────────────────────────
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Bearer token issuer and verifier
    pub authenticator: Arc<TokenAuthenticator>,
    /// Activation and permission checks
    pub authorizer: Arc<PermissionAuthorizer>,
    /// Per-client admission control
    pub limiter: RateLimiter,

    // ── Versioned writes ─────────────────────────────────────
    /// Guard for user updates
    pub user_guard: ConcurrencyGuard<dyn UserStore, User>,
    /// Guard for movie updates
    pub movie_guard: ConcurrencyGuard<dyn MovieStore, Movie>,
}

impl AppState {
    /// Wires the auth core and guards over `stores`.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let timeout = config.database.query_timeout();

        let authenticator = Arc::new(TokenAuthenticator::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.tokens),
            clock,
            timeout,
        ));
        let authorizer = Arc::new(PermissionAuthorizer::new(
            Arc::clone(&stores.permissions),
            timeout,
        ));
        let limiter = RateLimiter::new(config.limiter.clone());
        let user_guard = ConcurrencyGuard::new(Arc::clone(&stores.users), timeout);
        let movie_guard = ConcurrencyGuard::new(Arc::clone(&stores.movies), timeout);

        Self {
            config: Arc::new(config),
            stores,
            background: BackgroundTasks::new(),
            notifier,
            password_hasher: Arc::new(PasswordHasher::new()),
            authenticator,
            authorizer,
            limiter,
            user_guard,
            movie_guard,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.server.environment)
            .field("stores", &self.stores)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
