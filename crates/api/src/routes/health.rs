//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Apartment manager API is running".to_string(),
        timestamp: Utc::now(),
        environment: state.config.server.environment.clone(),
    })
}

/// Readiness probe: checks the database.
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    match persistence::db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "ready".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "database unavailable".to_string(),
                }),
            )
        }
    }
}

/// Liveness probe.
///
/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}
