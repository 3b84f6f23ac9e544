//! Permission-gated authorization.

pub mod authorizer;

pub use authorizer::PermissionAuthorizer;
