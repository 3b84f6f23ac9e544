//! Movie entity.

pub mod model;
pub mod runtime;

pub use model::{Movie, NewMovie};
