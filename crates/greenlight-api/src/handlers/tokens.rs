//! Authentication token handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use greenlight_core::error::AppError;
use greenlight_database::bounded;
use greenlight_entity::TokenScope;

use crate::dto::request::CreateTokenRequest;
use crate::dto::response::TokenEnvelope;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

fn invalid_credentials() -> AppError {
    AppError::invalid_credentials("invalid authentication credentials")
}

/// PUT /v1/tokens/authentication
pub async fn create_authentication_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTokenRequest>,
) -> ApiResult<(StatusCode, Json<TokenEnvelope>)> {
    let user = bounded(
        state.config.database.query_timeout(),
        "find user by email",
        state.stores.users.find_by_email(&req.email),
    )
    .await?
    .ok_or_else(invalid_credentials)?;

    let hasher = state.password_hasher.clone();
    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || hasher.verify_password(&req.password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))??;
    if !matches {
        return Err(invalid_credentials().into());
    }

    let token = state
        .authenticator
        .generate_token(
            user.id,
            state.config.auth.authentication_ttl(),
            TokenScope::Authentication,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(TokenEnvelope {
            authentication_token: token,
        }),
    ))
}
