//! Authenticated caller extractor and authorization gates.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Role;
use domain::services::access_control::{self, Scope};
use uuid::Uuid;

use crate::error::ApiError;

/// The caller resolved by [`crate::middleware::require_auth`].
///
/// Role comes from the database row, not the token, so demotions apply
/// immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// JWT ID (jti) of the presented token.
    pub jti: String,
}

fn forbidden() -> ApiError {
    ApiError::Forbidden("You do not have permission to perform this action".into())
}

impl CurrentUser {
    pub fn is_secretary(&self) -> bool {
        self.role == Role::Secretary
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if access_control::has_any_role(self.role, allowed) {
            Ok(())
        } else {
            Err(forbidden())
        }
    }

    pub fn require_min_role(&self, min: Role) -> Result<(), ApiError> {
        if access_control::has_min_role(self.role, min) {
            Ok(())
        } else {
            Err(forbidden())
        }
    }

    pub fn require_permission(&self, permission: &str) -> Result<(), ApiError> {
        if access_control::has_permission(self.role, permission) {
            Ok(())
        } else {
            Err(forbidden())
        }
    }

    /// Passes for the owner of the record and for the secretary.
    pub fn require_ownership(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if access_control::owns_resource(self.role, self.id, owner_id) {
            Ok(())
        } else {
            Err(forbidden())
        }
    }

    pub fn scope(&self, resource: &str, action: &str) -> Scope {
        access_control::scope_for(self.role, resource, action)
    }

    /// Like [`Self::scope`] but rejects [`Scope::Denied`] with 403.
    pub fn require_scope(&self, resource: &str, action: &str) -> Result<Scope, ApiError> {
        match self.scope(resource, action) {
            Scope::Denied => Err(forbidden()),
            scope => Ok(scope),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}
