//! Bearer token entities.

pub mod model;
pub mod scope;

pub use model::{Token, TokenRecord};
pub use scope::TokenScope;
