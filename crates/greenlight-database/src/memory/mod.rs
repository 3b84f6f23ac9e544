//! In-memory storage provider.

pub mod store;

pub use store::MemoryStore;
