//! Integration tests for bearer token resolution.

mod helpers;

use http::StatusCode;

use helpers::DEFAULT_CLIENT;

#[tokio::test]
async fn test_anonymous_request_passes_through() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/v1/healthcheck", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "available");
    assert_eq!(response.body["system_info"]["environment"], "testing");
    assert!(response.varies_on("Authorization"));
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let app = helpers::TestApp::new().await;
    app.create_activated_user("Ana", "ana@example.com").await;
    let token = app.login("ana@example.com").await;

    let response = app
        .request("GET", "/v1/healthcheck", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_header_is_rejected() {
    let app = helpers::TestApp::new().await;

    for header in ["Token abc", "Bearer", "Bearer a b", "bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ"] {
        let response = app
            .send(
                "GET",
                "/v1/healthcheck",
                None,
                &[("Authorization", header.to_string())],
                DEFAULT_CLIENT,
            )
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "header {header:?}");
        assert_eq!(response.error_code(), "MALFORMED_AUTH_HEADER");
        assert_eq!(response.header("www-authenticate"), Some("Bearer"));
        assert!(response.varies_on("Authorization"));
    }
}

#[tokio::test]
async fn test_wrong_length_token_is_invalid() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/v1/healthcheck", None, Some("short"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
    assert_eq!(response.header("www-authenticate"), Some("Bearer"));
}

#[tokio::test]
async fn test_unknown_token_is_invalid() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/v1/healthcheck",
            None,
            Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_is_invalid() {
    let app = helpers::TestApp::new().await;
    app.create_activated_user("Ben", "ben@example.com").await;
    let token = app.login("ben@example.com").await;

    app.clock.advance(chrono::Duration::hours(25));

    let response = app
        .request("GET", "/v1/healthcheck", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_activation_token_cannot_authenticate() {
    let app = helpers::TestApp::new().await;
    let id = app.register("Cleo", "cleo@example.com").await;
    let activation = app.activation_token(id).await;

    let response = app
        .request("GET", "/v1/healthcheck", None, Some(&activation))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}
