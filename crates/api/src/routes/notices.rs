//! Notice board routes. Readers only see active, unexpired notices targeted
//! at their role; the secretary sees everything.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::notice::{CreateNoticeRequest, ListNoticesQuery, UpdateNoticeRequest};
use domain::models::{Notice, Role};
use persistence::repositories::{NewNotice, NoticeFilter, NoticeRepository, NoticeUpdate};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound("Notice not found".into())
}

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

/// Loads a notice the caller may modify: `notices:<action>` or its author.
async fn load_for_write(
    repo: &NoticeRepository,
    user: &CurrentUser,
    id: Uuid,
    action: &str,
) -> Result<Notice, ApiError> {
    let notice: Notice = repo
        .find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    if user.require_permission(&format!("notices:{}", action)).is_err() {
        user.require_ownership(notice.author_id)?;
    }
    Ok(notice)
}

/// GET /api/notices
pub async fn list_notices(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListNoticesQuery>,
) -> Result<ApiResponse<Paginated<Notice>>, ApiError> {
    let page = query.page_params().normalize();
    let filter = NoticeFilter {
        viewer_role: (!user.is_secretary()).then(|| user.role.as_str().to_string()),
        is_pinned: query.is_pinned,
    };

    let now = Utc::now();
    let repo = NoticeRepository::new(state.pool.clone());
    let notices = repo
        .list(&filter, now, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("notices"))?;
    let total = repo
        .count(&filter, now)
        .await
        .map_err(fetch_failed("notices"))?;

    Ok(ApiResponse::ok(
        Paginated::new(notices, page, total).map(Notice::from),
    ))
}

/// GET /api/notices/:id
pub async fn get_notice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Notice>, ApiError> {
    let notice: Notice = NoticeRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(Notice::from)
        .filter(|n| n.visible_to(user.role, Utc::now()))
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(notice))
}

/// POST /api/notices
pub async fn create_notice(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateNoticeRequest>,
) -> Result<ApiResponse<Notice>, ApiError> {
    user.require_permission("notices:create")?;
    request.validate()?;

    let notice: Notice = NoticeRepository::new(state.pool.clone())
        .create(NewNotice {
            title: request.title.trim().to_string(),
            content: request.content,
            is_pinned: request.is_pinned,
            target_roles: role_names(&request.target_roles),
            author_id: user.id,
            expiry_date: request.expiry_date,
        })
        .await?
        .into();

    tracing::info!(notice_id = %notice.id, author_id = %user.id, "Notice published");
    Ok(ApiResponse::created(notice).with_message("Notice created successfully"))
}

/// PUT /api/notices/:id
pub async fn update_notice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateNoticeRequest>,
) -> Result<ApiResponse<Notice>, ApiError> {
    request.validate()?;
    let repo = NoticeRepository::new(state.pool.clone());
    load_for_write(&repo, &user, id, "update").await?;

    let notice: Notice = repo
        .update(
            id,
            NoticeUpdate {
                title: request.title.map(|t| t.trim().to_string()),
                content: request.content,
                is_pinned: request.is_pinned,
                target_roles: request.target_roles.as_deref().map(role_names),
                expiry_date: request.expiry_date,
                is_active: request.is_active,
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(notice).with_message("Notice updated successfully"))
}

/// PATCH /api/notices/:id/pin
pub async fn toggle_pin(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Notice>, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    load_for_write(&repo, &user, id, "update").await?;

    let notice: Notice = repo
        .toggle_pin(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    let message = if notice.is_pinned {
        "Notice pinned"
    } else {
        "Notice unpinned"
    };
    Ok(ApiResponse::ok(notice).with_message(message))
}

/// DELETE /api/notices/:id
pub async fn delete_notice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let repo = NoticeRepository::new(state.pool.clone());
    load_for_write(&repo, &user, id, "delete").await?;

    if !repo.delete(id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Notice deleted successfully"))
}
