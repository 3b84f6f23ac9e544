//! PostgreSQL repository implementations of the store traits.

pub mod movie;
pub mod permission;
pub mod token;
pub mod user;

pub use movie::MovieRepository;
pub use permission::PermissionRepository;
pub use token::TokenRepository;
pub use user::UserRepository;

/// Whether `err` is a unique-constraint violation on `constraint`.
///
/// Classifies on the driver's structured error rather than its message text.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
