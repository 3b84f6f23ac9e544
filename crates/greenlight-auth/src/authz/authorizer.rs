//! The authenticated → activated → permission check chain.
//!
//! Each link runs the previous one first and short-circuits on failure, so
//! an anonymous caller always sees `Unauthenticated` before anything else.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;
use greenlight_database::bounded;
use greenlight_database::store::PermissionStore;
use greenlight_entity::{Principal, User};

/// Enforces account state and permission membership for a principal.
#[derive(Clone)]
pub struct PermissionAuthorizer {
    /// Source of permission grants, read on every check.
    permissions: Arc<dyn PermissionStore>,
    /// Deadline for each storage call.
    timeout: Duration,
}

impl std::fmt::Debug for PermissionAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionAuthorizer")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PermissionAuthorizer {
    /// Creates a new authorizer.
    pub fn new(permissions: Arc<dyn PermissionStore>, timeout: Duration) -> Self {
        Self {
            permissions,
            timeout,
        }
    }

    /// Requires a non-anonymous principal.
    pub fn require_authenticated<'a>(&self, principal: &'a Principal) -> AppResult<&'a User> {
        principal.user().ok_or_else(|| {
            AppError::unauthenticated("you must be authenticated to access this resource")
        })
    }

    /// Requires an authenticated principal whose account is activated.
    pub fn require_activated<'a>(&self, principal: &'a Principal) -> AppResult<&'a User> {
        let user = self.require_authenticated(principal)?;
        if !user.activated {
            return Err(AppError::inactive(
                "your user account must be activated to access this resource",
            ));
        }
        Ok(user)
    }

    /// Requires an activated principal holding `code`.
    ///
    /// The permission set is fetched fresh on every call, so a revoked grant
    /// takes effect on the next request.
    pub async fn require_permission<'a>(
        &self,
        principal: &'a Principal,
        code: &str,
    ) -> AppResult<&'a User> {
        let user = self.require_activated(principal)?;

        let permissions = bounded(
            self.timeout,
            "load permissions",
            self.permissions.all_for_user(user.id),
        )
        .await?;

        if !permissions.includes(code) {
            debug!(user_id = user.id, permission = code, "Permission denied");
            return Err(AppError::forbidden(
                "your user account doesn't have the necessary permissions to access this resource",
            ));
        }
        Ok(user)
    }
}
