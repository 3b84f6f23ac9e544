//! User entity, password hash value object, and request principal.

pub mod model;
pub mod password;
pub mod principal;

pub use model::{NewUser, User};
pub use password::PasswordHash;
pub use principal::Principal;
