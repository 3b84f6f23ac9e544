//! Custom Axum extractors.

pub mod json;
pub mod path;
pub mod principal;

pub use json::ValidatedJson;
pub use path::parse_id;
pub use principal::CurrentPrincipal;
