//! # greenlight-entity
//!
//! Domain entity models for Greenlight. Structs that mirror a database row
//! derive `sqlx::FromRow`; value objects (`PasswordHash`, `PermissionSet`,
//! `Principal`) carry the invariants the auth layer relies on.

pub mod movie;
pub mod permission;
pub mod token;
pub mod user;
pub mod versioned;

pub use movie::{Movie, NewMovie};
pub use permission::PermissionSet;
pub use token::{Token, TokenRecord, TokenScope};
pub use user::{NewUser, PasswordHash, Principal, User};
pub use versioned::Versioned;
