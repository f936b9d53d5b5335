//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use uuid::Uuid;
use validator::Validate;

use super::role::Role;

/// Represents a user account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Emails are stored and compared lower-case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request payload for self-registration.
///
/// SECRETARY accounts cannot be self-registered; the service rejects them.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "firstName must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "lastName must be 1-50 characters"))]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub role: Role,
}

/// Request payload for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for a successful login or registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

impl AuthResponse {
    pub fn bearer(token: String, expires_in: i64, user: User) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            user,
        }
    }
}

/// Request payload for a secretary creating an account with any role.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "firstName must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "lastName must be 1-50 characters"))]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub role: Role,
}

/// Request payload for a secretary updating an account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "firstName must be 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "lastName must be 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub role: Option<Role>,

    pub is_active: Option<bool>,
}

/// Request payload for the caller updating their own profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "firstName must be 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "lastName must be 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateUserRequest {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            role: None,
            is_active: None,
        }
    }
}

/// Request payload for changing the caller's password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "currentPassword is required"))]
    pub current_password: String,

    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub new_password: String,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Matches email, first name or last name (case-insensitive).
    pub search: Option<String>,
}

impl ListUsersQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
