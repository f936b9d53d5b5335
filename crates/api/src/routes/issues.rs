//! Maintenance issue routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::issue::{
    CreateIssueRequest, ListIssuesQuery, UpdateIssueRequest, UpdateIssueStatusRequest,
};
use domain::models::{Issue, IssueStatus};
use domain::services::Scope;
use persistence::repositories::{IssueFilter, IssueRepository, IssueUpdate, NewIssue};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound("Issue not found".into())
}

async fn load_issue(repo: &IssueRepository, id: Uuid) -> Result<Issue, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)
}

/// `resolved_at` after moving `issue` to `target`: stamped on RESOLVED, kept
/// when closing a resolved issue, cleared otherwise.
pub(crate) fn resolved_at_for(
    issue: &Issue,
    target: IssueStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match target {
        IssueStatus::Resolved => Some(now),
        IssueStatus::Closed => issue.resolved_at,
        IssueStatus::Open | IssueStatus::InProgress => None,
    }
}

/// GET /api/issues
pub async fn list_issues(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListIssuesQuery>,
) -> Result<ApiResponse<Paginated<Issue>>, ApiError> {
    let scope = user.require_scope("issues", "read")?;

    let page = query.page_params().normalize();
    let filter = IssueFilter {
        status: query.status.map(|s| s.as_str().to_string()),
        priority: query.priority.map(|p| p.as_str().to_string()),
        category: query.category,
        reporter_id: match scope {
            Scope::Own => Some(user.id),
            _ => query.reporter_id,
        },
    };

    let repo = IssueRepository::new(state.pool.clone());
    let issues = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("issues"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("issues"))?;

    Ok(ApiResponse::ok(
        Paginated::new(issues, page, total).map(Issue::from),
    ))
}

/// GET /api/issues/:id
pub async fn get_issue(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Issue>, ApiError> {
    let scope = user.require_scope("issues", "read")?;
    let issue = load_issue(&IssueRepository::new(state.pool.clone()), id).await?;

    if scope == Scope::Own && issue.reporter_id != user.id {
        return Err(ApiError::Forbidden(
            "You can only view issues you reported".into(),
        ));
    }
    Ok(ApiResponse::ok(issue))
}

/// POST /api/issues
pub async fn create_issue(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateIssueRequest>,
) -> Result<ApiResponse<Issue>, ApiError> {
    user.require_permission("issues:create")?;
    request.validate()?;

    let issue: Issue = IssueRepository::new(state.pool.clone())
        .create(NewIssue {
            title: request.title.trim().to_string(),
            description: request.description,
            category: request.category.trim().to_string(),
            priority: request.priority.as_str().to_string(),
            reporter_id: user.id,
        })
        .await?
        .into();

    tracing::info!(issue_id = %issue.id, priority = %issue.priority, "Issue reported");
    Ok(ApiResponse::created(issue).with_message("Issue reported successfully"))
}

/// Staff and the secretary edit any issue; a reporter only while it is OPEN.
///
/// PUT /api/issues/:id
pub async fn update_issue(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIssueRequest>,
) -> Result<ApiResponse<Issue>, ApiError> {
    request.validate()?;
    let repo = IssueRepository::new(state.pool.clone());
    let existing = load_issue(&repo, id).await?;

    if user.require_scope("issues", "update")? == Scope::Own {
        user.require_ownership(existing.reporter_id)?;
        if existing.status != IssueStatus::Open {
            return Err(ApiError::Validation("Only open issues can be edited".into()));
        }
    }

    let issue: Issue = repo
        .update(
            id,
            IssueUpdate {
                title: request.title.map(|t| t.trim().to_string()),
                description: request.description,
                category: request.category.map(|c| c.trim().to_string()),
                priority: request.priority.map(|p| p.as_str().to_string()),
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(issue).with_message("Issue updated successfully"))
}

/// PATCH /api/issues/:id/status
pub async fn update_issue_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIssueStatusRequest>,
) -> Result<ApiResponse<Issue>, ApiError> {
    user.require_permission("issues:update")?;
    request.validate()?;

    let repo = IssueRepository::new(state.pool.clone());
    let existing = load_issue(&repo, id).await?;

    if !existing.status.can_transition_to(request.status) {
        return Err(ApiError::Validation(format!(
            "Cannot change issue status from {} to {}",
            existing.status, request.status
        )));
    }

    let resolved_at = resolved_at_for(&existing, request.status, Utc::now());
    let issue: Issue = repo
        .transition_status(
            id,
            existing.status.as_str(),
            request.status.as_str(),
            request.resolution.as_deref(),
            resolved_at,
        )
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Conflict("Issue status was changed by someone else".into()))?;

    tracing::info!(
        issue_id = %id,
        from = %existing.status,
        to = %issue.status,
        changed_by = %user.id,
        "Issue status changed"
    );
    Ok(ApiResponse::ok(issue).with_message("Issue status updated"))
}

/// DELETE /api/issues/:id
pub async fn delete_issue(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("issues:delete")?;

    if !IssueRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Issue deleted successfully"))
}
