//! Account notifications.

use async_trait::async_trait;
use tracing::info;

use greenlight_core::result::AppResult;
use greenlight_entity::{Token, User};

/// Delivers account messages to users.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Sends the welcome message carrying the activation token.
    async fn send_welcome(&self, user: &User, activation: &Token) -> AppResult<()>;
}

/// Notifier that only records the dispatch in the log.
///
/// Never writes the activation plaintext.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_welcome(&self, user: &User, activation: &Token) -> AppResult<()> {
        info!(
            user_id = user.id,
            email = %user.email,
            expiry = %activation.expiry,
            "Welcome notification dispatched"
        );
        Ok(())
    }
}
