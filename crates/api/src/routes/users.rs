//! User management routes (secretary), plus self lookup.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::user::{normalize_email, CreateUserRequest, ListUsersQuery, UpdateUserRequest};
use domain::models::User;
use persistence::repositories::{NewUser, UserFilter, UserRepository, UserUpdate};
use shared::pagination::Paginated;
use shared::password::hash_password;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".into())
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiResponse<Paginated<User>>, ApiError> {
    user.require_permission("users:read")?;

    let page = query.page_params().normalize();
    let filter = UserFilter {
        role: query.role.map(|r| r.as_str().to_string()),
        is_active: query.is_active,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let repo = UserRepository::new(state.pool.clone());
    let users = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("users"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("users"))?;

    Ok(ApiResponse::ok(
        Paginated::new(users, page, total).map(User::from),
    ))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<User>, ApiError> {
    if id != user.id {
        user.require_permission("users:read")?;
    }

    let found: User = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(found))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    user.require_permission("users:create")?;
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let email = normalize_email(&request.email);
    if repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".into(),
        ));
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let created: User = repo
        .create(NewUser {
            email,
            password_hash,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone: request.phone,
            role: request.role.as_str().to_string(),
        })
        .await?
        .into();

    tracing::info!(
        user_id = %created.id,
        role = %created.role,
        created_by = %user.id,
        "User created"
    );
    Ok(ApiResponse::created(created).with_message("User created successfully"))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    user.require_permission("users:update")?;
    request.validate()?;

    if id == user.id && request.is_active == Some(false) {
        return Err(ApiError::Validation(
            "You cannot deactivate your own account".into(),
        ));
    }

    let updated: User = UserRepository::new(state.pool.clone())
        .update(
            id,
            UserUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                role: request.role.map(|r| r.as_str().to_string()),
                is_active: request.is_active,
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(updated).with_message("User updated successfully"))
}

/// Deactivates instead of deleting so bills and leases keep their payer.
///
/// DELETE /api/users/:id
pub async fn deactivate_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("users:delete")?;

    if id == user.id {
        return Err(ApiError::Validation(
            "You cannot deactivate your own account".into(),
        ));
    }

    UserRepository::new(state.pool.clone())
        .update(
            id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(user_id = %id, deactivated_by = %user.id, "User deactivated");
    Ok(ApiResponse::message("User deactivated successfully"))
}
