//! Lease routes. Every mutation recomputes the flat's occupancy.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::lease::{
    validate_date_order, CreateLeaseRequest, ListLeasesQuery, UpdateLeaseRequest,
};
use domain::models::{Lease, Role};
use domain::services::{LeaseAlerts, Scope};
use persistence::entities::FlatEntity;
use persistence::repositories::{FlatRepository, LeaseFilter, LeaseRepository, LeaseUpdate, NewLease};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;
use crate::routes::require_user_with_role;
use crate::services::{LeaseLifecycleService, OccupancyService};

fn not_found() -> ApiError {
    ApiError::NotFound("Lease not found".into())
}

async fn load_flat(state: &AppState, flat_id: Uuid) -> Result<FlatEntity, ApiError> {
    FlatRepository::new(state.pool.clone())
        .find_by_id(flat_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flat not found".into()))
}

async fn load_lease(repo: &LeaseRepository, id: Uuid) -> Result<Lease, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)
}

/// Secretary for any flat; an owner only for their own flats.
fn authorize_write(user: &CurrentUser, action: &str, flat: &FlatEntity) -> Result<(), ApiError> {
    match user.require_scope("leases", action)? {
        Scope::All => Ok(()),
        _ => user.require_ownership(flat.owner_id),
    }
}

async fn ensure_no_overlap(
    repo: &LeaseRepository,
    flat_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let overlapping = repo.find_overlapping(flat_id, start, end, exclude_id).await?;
    if let Some(existing) = overlapping.first() {
        tracing::debug!(flat_id = %flat_id, existing_lease = %existing.id, "Lease overlap rejected");
        return Err(ApiError::Conflict(
            "Flat already has an active lease overlapping these dates".into(),
        ));
    }
    Ok(())
}

async fn recompute(state: &AppState, flat_id: Uuid) -> Result<(), ApiError> {
    OccupancyService::new(state.pool.clone())
        .recompute_occupancy(flat_id, Utc::now())
        .await?;
    Ok(())
}

/// GET /api/leases
pub async fn list_leases(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListLeasesQuery>,
) -> Result<ApiResponse<Paginated<Lease>>, ApiError> {
    let scope = user.require_scope("leases", "read")?;

    let page = query.page_params().normalize();
    let filter = LeaseFilter {
        flat_id: query.flat_id,
        tenant_id: query.tenant_id,
        is_active: query.is_active,
        party_id: (scope == Scope::Own).then_some(user.id),
    };

    let repo = LeaseRepository::new(state.pool.clone());
    let leases = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("leases"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("leases"))?;

    Ok(ApiResponse::ok(
        Paginated::new(leases, page, total).map(Lease::from),
    ))
}

/// GET /api/leases/alerts
pub async fn lease_alerts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ApiResponse<LeaseAlerts>, ApiError> {
    user.require_permission("leases:read")?;

    let alerts = LeaseLifecycleService::from_config(state.pool.clone(), &state.config.jobs)
        .compute_lease_alerts(Utc::now())
        .await?;

    Ok(ApiResponse::ok(alerts))
}

/// GET /api/leases/:id
pub async fn get_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Lease>, ApiError> {
    let scope = user.require_scope("leases", "read")?;
    let lease = load_lease(&LeaseRepository::new(state.pool.clone()), id).await?;

    if scope == Scope::Own && lease.tenant_id != user.id {
        let flat = load_flat(&state, lease.flat_id).await?;
        if flat.owner_id != user.id {
            return Err(ApiError::Forbidden(
                "You can only view your own leases".into(),
            ));
        }
    }

    Ok(ApiResponse::ok(lease))
}

/// POST /api/leases
pub async fn create_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateLeaseRequest>,
) -> Result<ApiResponse<Lease>, ApiError> {
    request.validate()?;
    let flat = load_flat(&state, request.flat_id).await?;
    authorize_write(&user, "create", &flat)?;
    require_user_with_role(&state.pool, request.tenant_id, Role::Tenant, "tenantId").await?;

    let repo = LeaseRepository::new(state.pool.clone());
    ensure_no_overlap(&repo, flat.id, request.start_date, request.end_date, None).await?;

    let lease: Lease = repo
        .create(NewLease {
            flat_id: request.flat_id,
            tenant_id: request.tenant_id,
            start_date: request.start_date,
            end_date: request.end_date,
            monthly_rent: request.monthly_rent,
            security_deposit: request.security_deposit,
        })
        .await?
        .into();
    recompute(&state, lease.flat_id).await?;

    tracing::info!(lease_id = %lease.id, flat_id = %lease.flat_id, "Lease created");
    Ok(ApiResponse::created(lease).with_message("Lease created successfully"))
}

/// PUT /api/leases/:id
pub async fn update_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLeaseRequest>,
) -> Result<ApiResponse<Lease>, ApiError> {
    request.validate()?;
    let repo = LeaseRepository::new(state.pool.clone());
    let existing = load_lease(&repo, id).await?;
    let flat = load_flat(&state, existing.flat_id).await?;
    authorize_write(&user, "update", &flat)?;

    let start = request.start_date.unwrap_or(existing.start_date);
    let end = request.end_date.unwrap_or(existing.end_date);
    validate_date_order(start, end).map_err(|e| {
        ApiError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid lease dates".into()),
        )
    })?;
    if request.is_active.unwrap_or(existing.is_active) {
        ensure_no_overlap(&repo, existing.flat_id, start, end, Some(id)).await?;
    }

    let lease: Lease = repo
        .update(
            id,
            LeaseUpdate {
                start_date: request.start_date,
                end_date: request.end_date,
                monthly_rent: request.monthly_rent,
                security_deposit: request.security_deposit,
                is_active: request.is_active,
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(not_found)?;
    recompute(&state, lease.flat_id).await?;

    Ok(ApiResponse::ok(lease).with_message("Lease updated successfully"))
}

/// PATCH /api/leases/:id/terminate
pub async fn terminate_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Lease>, ApiError> {
    let repo = LeaseRepository::new(state.pool.clone());
    let existing = load_lease(&repo, id).await?;
    let flat = load_flat(&state, existing.flat_id).await?;
    authorize_write(&user, "update", &flat)?;

    if !existing.is_active {
        return Err(ApiError::Validation("Lease is already inactive".into()));
    }

    let lease: Lease = repo
        .terminate(id, Utc::now())
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Validation("Lease is already inactive".into()))?;
    recompute(&state, lease.flat_id).await?;

    tracing::info!(lease_id = %id, terminated_by = %user.id, "Lease terminated");
    Ok(ApiResponse::ok(lease).with_message("Lease terminated successfully"))
}

/// DELETE /api/leases/:id
pub async fn delete_lease(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("leases:delete")?;
    let repo = LeaseRepository::new(state.pool.clone());
    let lease = load_lease(&repo, id).await?;

    if !repo.delete(id).await? {
        return Err(not_found());
    }
    recompute(&state, lease.flat_id).await?;

    Ok(ApiResponse::message("Lease deleted successfully"))
}
