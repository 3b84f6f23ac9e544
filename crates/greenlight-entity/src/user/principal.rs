//! The resolved identity of a request.

use super::model::User;

/// Who is making the request.
#[derive(Debug, Clone)]
pub enum Principal {
    /// No `Authorization` header was presented.
    Anonymous,
    /// A valid authentication token resolved to this user.
    Authenticated(User),
}

impl Principal {
    /// Returns true for the anonymous principal.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns the user behind an authenticated principal.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}
