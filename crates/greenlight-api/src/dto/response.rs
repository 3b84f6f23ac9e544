//! Response DTOs.

use serde::Serialize;

use greenlight_entity::{Movie, Token, User};

/// `{"user": ...}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    /// The user.
    pub user: User,
}

/// `{"authentication_token": ...}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TokenEnvelope {
    /// Freshly issued token; the only time its plaintext is returned.
    pub authentication_token: Token,
}

/// `{"movie": ...}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct MovieEnvelope {
    /// The movie.
    pub movie: Movie,
}

/// Plain message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `available` when the process can answer.
    pub status: String,
    /// Build and deployment details.
    pub system_info: SystemInfo,
}

/// Build and deployment details.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    /// Deployment environment label.
    pub environment: String,
    /// Crate version.
    pub version: String,
}
