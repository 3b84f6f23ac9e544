//! # greenlight-api
//!
//! HTTP API layer for Greenlight built on Axum.
//!
//! Provides the request pipeline (panic recovery, logging, CORS, rate
//! limiting, authentication, permission checks), extractors, DTOs, the
//! movie and account handlers, detached background work, and error mapping.

pub mod app;
pub mod background;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod notifier;
pub mod router;
pub mod state;

mod panic;

pub use app::build_app;
pub use background::BackgroundTasks;
pub use notifier::{LogNotifier, Notifier};
pub use state::AppState;
