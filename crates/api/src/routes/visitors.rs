//! Visitor log routes: guards log entries and exits, residents approve.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::visitor::{CreateVisitorRequest, ListVisitorsQuery, VisitorDecisionRequest};
use domain::models::{Role, VisitorLog};
use domain::services::Scope;
use persistence::repositories::{
    FlatRepository, NewVisitorLog, VisitorLogFilter, VisitorLogRepository,
};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;

/// Roles that staff the gate and record entries and exits.
const FRONT_DESK: &[Role] = &[Role::Guard, Role::Secretary];

fn not_found() -> ApiError {
    ApiError::NotFound("Visitor log not found".into())
}

async fn load_visitor(repo: &VisitorLogRepository, id: Uuid) -> Result<VisitorLog, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)
}

/// Passes for `visitors:<action>` or a resident of the visitor's flat.
async fn authorize_for_flat(
    state: &AppState,
    user: &CurrentUser,
    action: &str,
    flat_id: Uuid,
) -> Result<(), ApiError> {
    if user.require_scope("visitors", action)? == Scope::Own
        && !FlatRepository::new(state.pool.clone())
            .is_resident(flat_id, user.id)
            .await?
    {
        return Err(ApiError::Forbidden(
            "You can only manage visitors for your own flat".into(),
        ));
    }
    Ok(())
}

/// GET /api/visitors
pub async fn list_visitors(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListVisitorsQuery>,
) -> Result<ApiResponse<Paginated<VisitorLog>>, ApiError> {
    let scope = user.require_scope("visitors", "read")?;

    let page = query.page_params().normalize();
    let filter = VisitorLogFilter {
        flat_id: query.flat_id,
        is_approved: query.status.and_then(|s| s.as_approval()),
        filter_approval: query.status.is_some(),
        inside_only: query.inside.unwrap_or(false),
        resident_id: (scope == Scope::Own).then_some(user.id),
    };

    let repo = VisitorLogRepository::new(state.pool.clone());
    let visitors = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("visitors"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("visitors"))?;

    Ok(ApiResponse::ok(
        Paginated::new(visitors, page, total).map(VisitorLog::from),
    ))
}

/// GET /api/visitors/:id
pub async fn get_visitor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<VisitorLog>, ApiError> {
    let visitor = load_visitor(&VisitorLogRepository::new(state.pool.clone()), id).await?;
    authorize_for_flat(&state, &user, "read", visitor.flat_id).await?;
    Ok(ApiResponse::ok(visitor))
}

/// POST /api/visitors
pub async fn create_visitor(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateVisitorRequest>,
) -> Result<ApiResponse<VisitorLog>, ApiError> {
    user.require_role(FRONT_DESK)?;
    request.validate()?;

    if FlatRepository::new(state.pool.clone())
        .find_by_id(request.flat_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Flat not found".into()));
    }

    let visitor: VisitorLog = VisitorLogRepository::new(state.pool.clone())
        .create(NewVisitorLog {
            visitor_name: request.visitor_name.trim().to_string(),
            visitor_phone: request.visitor_phone,
            flat_id: request.flat_id,
            purpose: request.purpose,
            entry_time: request.entry_time.unwrap_or_else(Utc::now),
            logged_by_id: user.id,
        })
        .await?
        .into();

    tracing::info!(
        visitor_id = %visitor.id,
        flat_id = %visitor.flat_id,
        logged_by = %user.id,
        "Visitor entry logged"
    );
    Ok(ApiResponse::created(visitor).with_message("Visitor logged successfully"))
}

/// PATCH /api/visitors/:id/status
pub async fn decide_visitor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<VisitorDecisionRequest>,
) -> Result<ApiResponse<VisitorLog>, ApiError> {
    let repo = VisitorLogRepository::new(state.pool.clone());
    let existing = load_visitor(&repo, id).await?;
    authorize_for_flat(&state, &user, "approve", existing.flat_id).await?;

    let visitor: VisitorLog = repo
        .set_decision(id, request.is_approved, user.id, Utc::now())
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    tracing::info!(
        visitor_id = %id,
        status = %visitor.status(),
        decided_by = %user.id,
        "Visitor decision recorded"
    );
    let message = if request.is_approved {
        "Visitor approved"
    } else {
        "Visitor rejected"
    };
    Ok(ApiResponse::ok(visitor).with_message(message))
}

/// PATCH /api/visitors/:id/exit
pub async fn log_exit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<VisitorLog>, ApiError> {
    user.require_role(FRONT_DESK)?;

    let repo = VisitorLogRepository::new(state.pool.clone());
    let existing = load_visitor(&repo, id).await?;
    if !existing.is_inside() {
        return Err(ApiError::Validation("Visitor exit already logged".into()));
    }

    let visitor: VisitorLog = repo
        .mark_exit(id, Utc::now())
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Validation("Visitor exit already logged".into()))?;

    Ok(ApiResponse::ok(visitor).with_message("Visitor exit logged"))
}

/// DELETE /api/visitors/:id
pub async fn delete_visitor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("visitors:delete")?;

    if !VisitorLogRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Visitor log deleted successfully"))
}
