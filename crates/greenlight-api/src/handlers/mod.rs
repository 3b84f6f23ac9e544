//! HTTP request handlers.

pub mod fallback;
pub mod health;
pub mod movies;
pub mod tokens;
pub mod users;
