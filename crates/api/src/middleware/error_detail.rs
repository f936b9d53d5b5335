//! Development-only exposure of internal error detail.
//!
//! `ApiError` never writes store or hashing failures into the body. It
//! attaches them as [`InternalErrorDetail`], and this layer swaps them into
//! the `message` when the server runs in development.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::error::InternalErrorDetail;

/// Middleware that reveals internal error detail outside production.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    if state.config.is_development() {
        with_detail(response)
    } else {
        response
    }
}

/// Rewrites the body of a response carrying [`InternalErrorDetail`].
pub fn with_detail(mut response: Response) -> Response {
    match response.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => (
            response.status(),
            Json(json!({ "success": false, "message": detail })),
        )
            .into_response(),
        None => response,
    }
}
