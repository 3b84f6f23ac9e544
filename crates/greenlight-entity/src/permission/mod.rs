//! Permission codes granted to users.

use std::collections::HashSet;

use serde::Serialize;

/// Read access to movies.
pub const MOVIES_READ: &str = "movies:read";

/// Create, update, and delete access to movies.
pub const MOVIES_WRITE: &str = "movies:write";

/// The permission codes held by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `code` is in the set.
    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Number of codes held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_includes() {
        let set: PermissionSet = [MOVIES_READ].into_iter().collect();
        assert!(set.includes(MOVIES_READ));
        assert!(!set.includes(MOVIES_WRITE));
        assert_eq!(set.len(), 1);
        assert!(PermissionSet::new().is_empty());
    }
}
