//! Flat routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::flat::{CreateFlatRequest, ListFlatsQuery, OccupancyResponse, UpdateFlatRequest};
use domain::models::{Flat, Role};
use domain::services::Scope;
use persistence::repositories::{FlatFilter, FlatRepository, FlatUpdate, NewFlat};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;
use crate::routes::require_user_with_role;
use crate::services::OccupancyService;

fn not_found() -> ApiError {
    ApiError::NotFound("Flat not found".into())
}

/// GET /api/flats
pub async fn list_flats(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListFlatsQuery>,
) -> Result<ApiResponse<Paginated<Flat>>, ApiError> {
    let scope = user.require_scope("flats", "read")?;

    let page = query.page_params().normalize();
    let filter = FlatFilter {
        occupancy_status: query.occupancy_status.map(|s| s.as_str().to_string()),
        floor: query.floor,
        owner_id: query.owner_id,
        resident_id: (scope == Scope::Own).then_some(user.id),
    };

    let repo = FlatRepository::new(state.pool.clone());
    let flats = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("flats"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("flats"))?;

    Ok(ApiResponse::ok(
        Paginated::new(flats, page, total).map(Flat::from),
    ))
}

/// GET /api/flats/:id
pub async fn get_flat(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Flat>, ApiError> {
    let scope = user.require_scope("flats", "read")?;
    let repo = FlatRepository::new(state.pool.clone());

    let flat: Flat = repo.find_by_id(id).await?.map(Into::into).ok_or_else(not_found)?;

    if scope == Scope::Own && !repo.is_resident(id, user.id).await? {
        return Err(ApiError::Forbidden(
            "You can only view flats you own or rent".into(),
        ));
    }

    Ok(ApiResponse::ok(flat))
}

/// POST /api/flats
pub async fn create_flat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateFlatRequest>,
) -> Result<ApiResponse<Flat>, ApiError> {
    user.require_permission("flats:create")?;
    request.validate()?;
    require_user_with_role(&state.pool, request.owner_id, Role::Owner, "ownerId").await?;

    let flat: Flat = FlatRepository::new(state.pool.clone())
        .create(NewFlat {
            flat_number: request.flat_number.trim().to_string(),
            floor: request.floor,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area: request.area,
            owner_id: request.owner_id,
        })
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("A flat with this number already exists".into())
            }
            other => other,
        })?
        .into();

    tracing::info!(flat_id = %flat.id, flat_number = %flat.flat_number, "Flat created");
    Ok(ApiResponse::created(flat).with_message("Flat created successfully"))
}

/// PUT /api/flats/:id
pub async fn update_flat(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFlatRequest>,
) -> Result<ApiResponse<Flat>, ApiError> {
    user.require_permission("flats:update")?;
    request.validate()?;
    if let Some(owner_id) = request.owner_id {
        require_user_with_role(&state.pool, owner_id, Role::Owner, "ownerId").await?;
    }

    let flat: Flat = FlatRepository::new(state.pool.clone())
        .update(
            id,
            FlatUpdate {
                flat_number: request.flat_number.map(|n| n.trim().to_string()),
                floor: request.floor,
                bedrooms: request.bedrooms,
                bathrooms: request.bathrooms,
                area: request.area,
                owner_id: request.owner_id,
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(flat).with_message("Flat updated successfully"))
}

/// DELETE /api/flats/:id
pub async fn delete_flat(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("flats:delete")?;

    if !FlatRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(flat_id = %id, deleted_by = %user.id, "Flat deleted");
    Ok(ApiResponse::message("Flat deleted successfully"))
}

/// POST /api/flats/:id/occupancy
pub async fn recompute_occupancy(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<OccupancyResponse>, ApiError> {
    user.require_min_role(Role::Owner)?;

    let flat = FlatRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(not_found)?;
    user.require_ownership(flat.owner_id)?;

    let occupancy_status = OccupancyService::new(state.pool.clone())
        .recompute_occupancy(id, Utc::now())
        .await?;

    Ok(ApiResponse::ok(OccupancyResponse {
        flat_id: id,
        occupancy_status,
    }))
}
