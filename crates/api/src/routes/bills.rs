//! Bill routes. The payer is always chosen by the occupancy policy.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::bill::{CreateBillRequest, ListBillsQuery, UpdateBillRequest};
use domain::models::{Bill, BillStatus};
use domain::services::Scope;
use persistence::repositories::{BillFilter, BillRepository, BillUpdate, FlatRepository, NewBill};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{fetch_failed, ApiError};
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;
use crate::services::OccupancyService;

fn not_found() -> ApiError {
    ApiError::NotFound("Bill not found".into())
}

async fn load_bill(repo: &BillRepository, id: Uuid) -> Result<Bill, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(not_found)
}

/// GET /api/bills
pub async fn list_bills(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListBillsQuery>,
) -> Result<ApiResponse<Paginated<Bill>>, ApiError> {
    let scope = user.require_scope("bills", "read")?;

    let page = query.page_params().normalize();
    let filter = BillFilter {
        flat_id: query.flat_id,
        user_id: query.user_id,
        status: query.status.map(|s| s.as_str().to_string()),
        bill_type: query.bill_type.map(|t| t.as_str().to_string()),
        party_id: (scope == Scope::Own).then_some(user.id),
    };

    let repo = BillRepository::new(state.pool.clone());
    let bills = repo
        .list(&filter, page.limit(), page.offset())
        .await
        .map_err(fetch_failed("bills"))?;
    let total = repo
        .count(&filter)
        .await
        .map_err(fetch_failed("bills"))?;

    Ok(ApiResponse::ok(
        Paginated::new(bills, page, total).map(Bill::from),
    ))
}

/// GET /api/bills/:id
pub async fn get_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Bill>, ApiError> {
    let scope = user.require_scope("bills", "read")?;
    let bill = load_bill(&BillRepository::new(state.pool.clone()), id).await?;

    if scope == Scope::Own && bill.user_id != user.id {
        let owns_flat = FlatRepository::new(state.pool.clone())
            .find_by_id(bill.flat_id)
            .await?
            .is_some_and(|flat| flat.owner_id == user.id);
        if !owns_flat {
            return Err(ApiError::Forbidden("You can only view your own bills".into()));
        }
    }

    Ok(ApiResponse::ok(bill))
}

/// POST /api/bills
pub async fn create_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateBillRequest>,
) -> Result<ApiResponse<Bill>, ApiError> {
    user.require_permission("bills:create")?;
    request.validate()?;

    let payer = OccupancyService::new(state.pool.clone())
        .assign_payer(request.flat_id, request.bill_type, Utc::now())
        .await?;

    let bill: Bill = BillRepository::new(state.pool.clone())
        .create(NewBill {
            flat_id: request.flat_id,
            user_id: payer.id,
            bill_type: request.bill_type.as_str().to_string(),
            amount: request.amount,
            due_date: request.due_date,
            description: request.description,
        })
        .await?
        .into();

    tracing::info!(
        bill_id = %bill.id,
        flat_id = %bill.flat_id,
        payer_id = %bill.user_id,
        bill_type = %bill.bill_type,
        "Bill created"
    );
    Ok(ApiResponse::created(bill).with_message("Bill created successfully"))
}

/// PUT /api/bills/:id
pub async fn update_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<ApiResponse<Bill>, ApiError> {
    user.require_permission("bills:update")?;
    request.validate()?;

    let repo = BillRepository::new(state.pool.clone());
    let existing = load_bill(&repo, id).await?;
    if existing.status == BillStatus::Paid {
        return Err(ApiError::Validation("Paid bills cannot be modified".into()));
    }

    let bill: Bill = repo
        .update_unpaid(
            id,
            BillUpdate {
                amount: request.amount,
                due_date: request.due_date,
                description: request.description,
            },
        )
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Validation("Paid bills cannot be modified".into()))?;

    Ok(ApiResponse::ok(bill).with_message("Bill updated successfully"))
}

/// DELETE /api/bills/:id
pub async fn delete_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    user.require_permission("bills:delete")?;

    if !BillRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Bill deleted successfully"))
}

/// DUE or OVERDUE to PAID. Only the payer or the secretary may pay.
///
/// PATCH /api/bills/:id/pay
pub async fn pay_bill(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Bill>, ApiError> {
    let repo = BillRepository::new(state.pool.clone());
    let existing = load_bill(&repo, id).await?;

    match user.require_scope("bills", "pay")? {
        Scope::All => {}
        _ if existing.user_id == user.id => {}
        _ => {
            return Err(ApiError::Forbidden(
                "Only the assigned payer can pay this bill".into(),
            ))
        }
    }

    if existing.status == BillStatus::Paid {
        return Err(ApiError::Validation("Bill is already paid".into()));
    }

    let bill: Bill = repo
        .mark_paid(id, Utc::now())
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::Validation("Bill is already paid".into()))?;

    tracing::info!(bill_id = %id, paid_by = %user.id, "Bill paid");
    Ok(ApiResponse::ok(bill).with_message("Bill paid successfully"))
}
