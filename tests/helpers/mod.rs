//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use greenlight_api::app::with_middleware;
use greenlight_api::router::routes;
use greenlight_api::{AppState, Notifier};
use greenlight_core::config::AppConfig;
use greenlight_core::result::AppResult;
use greenlight_core::traits::ManualClock;
use greenlight_database::Stores;
use greenlight_database::memory::MemoryStore;
use greenlight_database::store::PermissionStore;
use greenlight_entity::permission::MOVIES_WRITE;
use greenlight_entity::{Token, User};

/// Address every request comes from unless a test picks another.
pub const DEFAULT_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

/// Password used by the account helpers.
pub const PASSWORD: &str = "pa55word";

/// Notifier that keeps every activation plaintext it is handed.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    /// Latest activation plaintext sent to `user_id`, if any.
    pub fn token_for(&self, user_id: i64) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| *id == user_id)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_welcome(&self, user: &User, activation: &Token) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((user.id, activation.plaintext.clone()));
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared application state
    pub state: AppState,
    /// Backing store for direct manipulation
    pub store: Arc<MemoryStore>,
    /// Clock the authenticator compares expiries against
    pub clock: Arc<ManualClock>,
    /// Captured welcome messages
    pub notifier: Arc<RecordingNotifier>,
}

/// Memory-backed configuration with the limiter switched off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.environment = "testing".to_string();
    config.database.provider = "memory".to_string();
    config.limiter.enabled = false;
    config
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::build(test_config(), Router::new())
    }

    /// Create a test application with custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        Self::build(config, Router::new())
    }

    /// Create a test application with extra routes behind the full pipeline
    pub async fn with_routes(extra: Router<AppState>) -> Self {
        Self::build(test_config(), extra)
    }

    fn build(config: AppConfig, extra: Router<AppState>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let state = AppState::new(
            config,
            Stores::memory(Arc::clone(&store)),
            clock.clone(),
            notifier.clone(),
        );
        let router = with_middleware(routes(&state).merge(extra), state.clone());

        Self {
            router,
            state,
            store,
            clock,
            notifier,
        }
    }

    /// Register a user and return their ID
    pub async fn register(&self, name: &str, email: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/v1/users",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::ACCEPTED,
            "Registration failed: {:?}",
            response.body
        );

        response.body["user"]["id"]
            .as_i64()
            .expect("No user id in registration response")
    }

    /// Wait for the welcome message and return its activation token
    pub async fn activation_token(&self, user_id: i64) -> String {
        for _ in 0..200 {
            if let Some(token) = self.notifier.token_for(user_id) {
                return token;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no activation token was sent to user {user_id}");
    }

    /// Register and activate a user, returning their ID
    pub async fn create_activated_user(&self, name: &str, email: &str) -> i64 {
        let id = self.register(name, email).await;
        let token = self.activation_token(id).await;

        let response = self
            .request(
                "PUT",
                "/v1/users/activated",
                Some(serde_json::json!({ "token": token })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Activation failed: {:?}",
            response.body
        );

        id
    }

    /// Grant `movies:write` directly in the store
    pub async fn grant_write(&self, user_id: i64) {
        self.store
            .add_for_user(user_id, &[MOVIES_WRITE])
            .await
            .expect("Failed to grant permission");
    }

    /// Login and return the authentication token plaintext
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "PUT",
                "/v1/tokens/authentication",
                Some(serde_json::json!({
                    "email": email,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["authentication_token"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Activated user holding `movies:write`, logged in
    pub async fn writer(&self, email: &str) -> String {
        let id = self.create_activated_user("Writer", email).await;
        self.grant_write(id).await;
        self.login(email).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let headers = token
            .map(|t| vec![("Authorization", format!("Bearer {t}"))])
            .unwrap_or_default();
        self.send(method, path, body, &headers, DEFAULT_CLIENT).await
    }

    /// Make an HTTP request with explicit headers and client address
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, String)],
        client: IpAddr,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }

        let mut req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(client, 40000)));

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Machine-readable error code from an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether any `Vary` value names `header`
    pub fn varies_on(&self, header: &str) -> bool {
        self.headers
            .get_all("vary")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|v| v.trim().eq_ignore_ascii_case(header))
    }
}
