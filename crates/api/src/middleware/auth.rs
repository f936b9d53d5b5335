//! Bearer token authentication middleware.
//!
//! Verifies the access token, then reloads the user so deactivation and role
//! changes take effect without waiting for the token to expire.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::User;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid Authorization header".into()))?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        ApiError::Unauthorized("Invalid or expired token".into())
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;

    let user: User = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".into()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated".into()));
    }

    Ok(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
        jti: claims.jti,
    })
}

/// Middleware that requires a valid access token for an active user.
///
/// The authenticated [`CurrentUser`] is stored in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", tracing::field::display(user.id));
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token(""), None);
    }
}
