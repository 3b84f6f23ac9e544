//! Integration tests for the shared request pipeline.

mod helpers;

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::routing::get;
use http::StatusCode;

use helpers::DEFAULT_CLIENT;

async fn explode() -> &'static str {
    panic!("handler exploded");
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/v1/nothing-here", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_wrong_method_is_json_method_not_allowed() {
    let app = helpers::TestApp::new().await;

    let response = app.request("DELETE", "/v1/healthcheck", None, None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.error_code(), "METHOD_NOT_ALLOWED");
    assert!(
        response.body["message"]
            .as_str()
            .is_some_and(|m| m.contains("DELETE"))
    );
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let extra = Router::new().route("/v1/explode", get(explode));
    let app = helpers::TestApp::with_routes(extra).await;

    let response = app.request("GET", "/v1/explode", None, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code(), "INTERNAL");
    let message = response.body["message"].as_str().unwrap_or_default();
    assert!(!message.contains("exploded"));

    // The server keeps serving after a handler panic.
    let response = app.request("GET", "/v1/healthcheck", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let mut config = helpers::test_config();
    config.limiter.enabled = true;
    config.limiter.requests_per_second = 0.001;
    config.limiter.burst = 2;
    let app = helpers::TestApp::with_config(config).await;

    for _ in 0..2 {
        let response = app.request("GET", "/v1/healthcheck", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.request("GET", "/v1/healthcheck", None, None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), "RATE_LIMITED");

    let other = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 20));
    let response = app
        .send("GET", "/v1/healthcheck", None, &[], other)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.state.limiter.tracked_clients().await, 2);
}

#[tokio::test]
async fn test_rate_limit_runs_before_authentication() {
    let mut config = helpers::test_config();
    config.limiter.enabled = true;
    config.limiter.requests_per_second = 0.001;
    config.limiter.burst = 1;
    let app = helpers::TestApp::with_config(config).await;

    let response = app.request("GET", "/v1/healthcheck", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    // An exhausted client is turned away before its header is examined.
    let response = app
        .send(
            "GET",
            "/v1/healthcheck",
            None,
            &[("Authorization", "Token nope".to_string())],
            DEFAULT_CLIENT,
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_cors_echoes_trusted_origin_only() {
    let mut config = helpers::test_config();
    config.server.cors.trusted_origins = vec!["https://greenlight.example".to_string()];
    let app = helpers::TestApp::with_config(config).await;

    let response = app
        .send(
            "GET",
            "/v1/healthcheck",
            None,
            &[("Origin", "https://greenlight.example".to_string())],
            DEFAULT_CLIENT,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("https://greenlight.example")
    );

    let response = app
        .send(
            "GET",
            "/v1/healthcheck",
            None,
            &[("Origin", "https://evil.example".to_string())],
            DEFAULT_CLIENT,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_preflight() {
    let mut config = helpers::test_config();
    config.server.cors.trusted_origins = vec!["https://greenlight.example".to_string()];
    let app = helpers::TestApp::with_config(config).await;

    let response = app
        .send(
            "OPTIONS",
            "/v1/movies/1",
            None,
            &[
                ("Origin", "https://greenlight.example".to_string()),
                ("Access-Control-Request-Method", "PATCH".to_string()),
            ],
            DEFAULT_CLIENT,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .header("access-control-allow-methods")
            .is_some_and(|m| m.contains("PATCH"))
    );
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/v1/users",
            Some(serde_json::json!({
                "name": "x".repeat(2 * 1024 * 1024),
                "email": "big@example.com",
                "password": helpers::PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}
