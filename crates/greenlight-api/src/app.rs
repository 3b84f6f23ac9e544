//! Application builder: wires routes, middleware, and state into an Axum app.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::authenticate::authenticate;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::panic::handle_panic;
use crate::middleware::rate_limit::rate_limit;
use crate::router::routes;
use crate::state::AppState;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let routes = routes(&state);
    with_middleware(routes, state)
}

/// Wraps `routes` in the request pipeline.
///
/// Outermost to innermost: panic recovery, tracing spans, request logging,
/// CORS, rate limiting, authentication, body limit.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    routes
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(cors)
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
