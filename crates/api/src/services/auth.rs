//! Authentication service: registration, login and self-service account changes.

use std::sync::Arc;

use domain::models::user::{
    normalize_email, AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest,
};
use domain::models::{Role, User};
use persistence::repositories::{NewUser, UserRepository, UserUpdate};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Role {0} cannot self-register")]
    RoleNotAllowed(Role),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("A user with this email already exists".into())
            }
            AuthError::RoleNotAllowed(role) => {
                ApiError::Forbidden(format!("Cannot register with role {}", role))
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            AuthError::WrongPassword => ApiError::Validation("Current password is incorrect".into()),
            AuthError::UserNotFound => ApiError::NotFound("User not found".into()),
            AuthError::UserDisabled => ApiError::Unauthorized("Account is deactivated".into()),
            AuthError::DatabaseError(e) => e.into(),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Self-registration. The secretary account only comes from bootstrap
    /// or another secretary.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if req.role == Role::Secretary {
            return Err(AuthError::RoleNotAllowed(req.role));
        }

        let email = normalize_email(&req.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&req.password)?;
        let user: User = self
            .users
            .create(NewUser {
                email,
                password_hash,
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                phone: req.phone,
                role: req.role.as_str().to_string(),
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::EmailAlreadyExists
                } else {
                    AuthError::DatabaseError(e)
                }
            })?
            .into();

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.issue(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&req.email);
        let user: User = self
            .users
            .find_by_email(&email)
            .await?
            .map(Into::into)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&req.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue(user)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(Into::into)
            .ok_or(AuthError::UserNotFound)
    }

    /// Updates name and phone only; role and status stay with the secretary.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        self.users
            .update(
                user_id,
                UserUpdate {
                    first_name: req.first_name,
                    last_name: req.last_name,
                    phone: req.phone,
                    ..Default::default()
                },
            )
            .await?
            .map(Into::into)
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        let user = self.me(user_id).await?;
        if !verify_password(&req.current_password, &user.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        let password_hash = hash_password(&req.new_password)?;
        if !self.users.update_password(user_id, &password_hash).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    fn issue(&self, user: User) -> Result<AuthResponse, AuthError> {
        let issued = self.jwt.issue_access_token(user.id, user.role.as_str())?;
        Ok(AuthResponse::bearer(issued.token, issued.expires_in, user))
    }
}
