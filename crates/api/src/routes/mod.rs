//! HTTP route handlers.

pub mod auth;
pub mod bills;
pub mod dashboard;
pub mod flats;
pub mod health;
pub mod issues;
pub mod leases;
pub mod notices;
pub mod users;
pub mod visitors;

use domain::models::{Role, User};
use persistence::repositories::UserRepository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Loads the referenced user and checks it holds `role`.
///
/// `field` names the request field in the 400 message.
pub(crate) async fn require_user_with_role(
    pool: &PgPool,
    user_id: Uuid,
    role: Role,
    field: &str,
) -> Result<User, ApiError> {
    let user: User = UserRepository::new(pool.clone())
        .find_by_id(user_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Validation(format!("{} does not reference an existing user", field)))?;

    if user.role != role || !user.is_active {
        return Err(ApiError::Validation(format!(
            "{} must reference an active user with role {}",
            field, role
        )));
    }
    Ok(user)
}
