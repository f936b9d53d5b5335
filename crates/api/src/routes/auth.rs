//! Authentication routes: registration, login and the caller's own account.

use axum::{extract::State, Json};
use domain::models::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use domain::models::User;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;
use crate::services::AuthService;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), state.jwt.clone())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    request.validate()?;
    let response = auth_service(&state).register(request).await?;
    Ok(ApiResponse::created(response).with_message("User registered successfully"))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    request.validate()?;
    let response = auth_service(&state).login(request).await?;
    Ok(ApiResponse::ok(response).with_message("Login successful"))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ApiResponse<User>, ApiError> {
    let me = auth_service(&state).me(user.id).await?;
    Ok(ApiResponse::ok(me))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    request.validate()?;
    let updated = auth_service(&state).update_profile(user.id, request).await?;
    Ok(ApiResponse::ok(updated).with_message("Profile updated"))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    request.validate()?;
    auth_service(&state).change_password(user.id, request).await?;
    Ok(ApiResponse::message("Password changed successfully"))
}
