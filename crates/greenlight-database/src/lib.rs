//! # greenlight-database
//!
//! Storage layer for Greenlight: the store traits the auth core consumes,
//! PostgreSQL repositories, an in-process provider, deadline-bounded calls,
//! and the optimistic concurrency guard for version-stamped writes.

pub mod bounded;
pub mod concurrency;
pub mod connection;
pub mod memory;
pub mod provider;
pub mod repositories;
pub mod store;

pub use bounded::bounded;
pub use concurrency::ConcurrencyGuard;
pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use provider::Stores;
pub use store::{MovieStore, PermissionStore, TokenStore, UserStore, VersionedStore};
