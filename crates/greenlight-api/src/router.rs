//! Route definitions for the Greenlight HTTP API.
//!
//! All routes are versioned under `/v1`. Movie routes carry their permission
//! check as a route layer, so it runs after authentication and before the
//! handler.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};

use crate::handlers;
use crate::middleware::authorize::{require_movies_read, require_movies_write};
use crate::state::AppState;

/// Every route, without the shared middleware stack.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .merge(account_routes())
        .merge(movie_routes(state))
        .fallback(handlers::fallback::not_found)
        .method_not_allowed_fallback(handlers::fallback::method_not_allowed)
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/v1/healthcheck", get(handlers::health::healthcheck))
}

/// Registration, activation, and login
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users", post(handlers::users::register_user))
        .route("/v1/users/activated", put(handlers::users::activate_user))
        .route(
            "/v1/tokens/authentication",
            put(handlers::tokens::create_authentication_token),
        )
}

/// Permission-gated movie endpoints
fn movie_routes(state: &AppState) -> Router<AppState> {
    let read = from_fn_with_state(state.clone(), require_movies_read);
    let write = from_fn_with_state(state.clone(), require_movies_write);

    Router::new()
        .route(
            "/v1/movies",
            post(handlers::movies::create_movie).route_layer(write.clone()),
        )
        .route(
            "/v1/movies/{id}",
            get(handlers::movies::show_movie).route_layer(read).merge(
                patch(handlers::movies::update_movie)
                    .delete(handlers::movies::delete_movie)
                    .route_layer(write),
            ),
        )
}
