//! Account handlers: registration and activation.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{info, warn};

use greenlight_auth::token::validate_plaintext;
use greenlight_core::error::{AppError, ErrorKind};
use greenlight_database::bounded;
use greenlight_entity::permission::MOVIES_READ;
use greenlight_entity::{NewUser, Token, TokenScope, User};

use crate::dto::request::{ActivateUserRequest, RegisterUserRequest};
use crate::dto::response::UserEnvelope;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::notifier::Notifier;
use crate::state::AppState;

const WELCOME_ATTEMPTS: u32 = 3;
const WELCOME_RETRY_DELAY: Duration = Duration::from_millis(500);

/// POST /v1/users
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserEnvelope>)> {
    let timeout = state.config.database.query_timeout();

    let hasher = state.password_hasher.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash_password(&req.password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))??;

    let new_user = NewUser::new(req.name, req.email, password_hash);
    let user = bounded(timeout, "insert user", state.stores.users.insert(&new_user)).await?;

    bounded(
        timeout,
        "grant permissions",
        state.stores.permissions.add_for_user(user.id, &[MOVIES_READ]),
    )
    .await?;

    let activation = state
        .authenticator
        .generate_token(
            user.id,
            state.config.auth.activation_ttl(),
            TokenScope::Activation,
        )
        .await?;

    info!(user_id = user.id, "User registered");

    let notifier = Arc::clone(&state.notifier);
    let recipient = user.clone();
    state.background.spawn("welcome notification", async move {
        send_welcome(notifier.as_ref(), &recipient, &activation).await;
    });

    Ok((StatusCode::ACCEPTED, Json(UserEnvelope { user })))
}

async fn send_welcome(notifier: &dyn Notifier, user: &User, activation: &Token) {
    for attempt in 1..=WELCOME_ATTEMPTS {
        match notifier.send_welcome(user, activation).await {
            Ok(()) => return,
            Err(e) => {
                warn!(user_id = user.id, attempt, error = %e, "Welcome notification failed");
                if attempt < WELCOME_ATTEMPTS {
                    tokio::time::sleep(WELCOME_RETRY_DELAY).await;
                }
            }
        }
    }
}

/// PUT /v1/users/activated
pub async fn activate_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ActivateUserRequest>,
) -> ApiResult<Json<UserEnvelope>> {
    validate_plaintext(&req.token)?;

    let mut user = state
        .authenticator
        .user_for_token(TokenScope::Activation, &req.token)
        .await
        .map_err(|err| match err.kind {
            ErrorKind::InvalidToken => {
                AppError::field("token", "invalid or expired activation token")
            }
            _ => err,
        })?;

    user.activated = true;
    state.user_guard.update(&mut user).await?;

    state
        .authenticator
        .revoke_all_for_user(user.id, TokenScope::Activation)
        .await?;

    info!(user_id = user.id, "User activated");
    Ok(Json(UserEnvelope { user }))
}
