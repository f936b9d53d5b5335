//! Role-shaped dashboard summary.

use axum::extract::State;
use chrono::Utc;
use domain::models::dashboard::{BillMetrics, FlatMetrics};
use domain::models::{BillStatus, DashboardSummary, OccupancyStatus, Role};
use persistence::entities::{BillStatusTotalRow, OccupancyCountRow};
use persistence::repositories::{
    BillRepository, FlatRepository, IssueRepository, VisitorLogFilter, VisitorLogRepository,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::response::ApiResponse;
use crate::services::LeaseLifecycleService;

pub(crate) fn flat_metrics(rows: &[OccupancyCountRow]) -> FlatMetrics {
    let mut metrics = FlatMetrics::default();
    for row in rows {
        metrics.total += row.count;
        match row.occupancy_status.parse::<OccupancyStatus>() {
            Ok(OccupancyStatus::Vacant) => metrics.vacant += row.count,
            Ok(OccupancyStatus::OwnerOccupied) => metrics.owner_occupied += row.count,
            Ok(OccupancyStatus::TenantOccupied) => metrics.tenant_occupied += row.count,
            Err(_) => {}
        }
    }
    metrics
}

/// Outstanding amount covers DUE and OVERDUE bills.
pub(crate) fn bill_metrics(rows: &[BillStatusTotalRow]) -> BillMetrics {
    let mut metrics = BillMetrics::default();
    for row in rows {
        match row.status.parse::<BillStatus>() {
            Ok(BillStatus::Due) => {
                metrics.due += row.count;
                metrics.outstanding_amount += row.total_amount;
            }
            Ok(BillStatus::Overdue) => {
                metrics.overdue += row.count;
                metrics.outstanding_amount += row.total_amount;
            }
            Ok(BillStatus::Paid) => metrics.paid += row.count,
            Err(_) => {}
        }
    }
    metrics
}

async fn pending_visitors(state: &AppState, resident_id: Option<Uuid>) -> Result<i64, ApiError> {
    let filter = VisitorLogFilter {
        filter_approval: true,
        is_approved: None,
        resident_id,
        ..Default::default()
    };
    Ok(VisitorLogRepository::new(state.pool.clone())
        .count(&filter)
        .await?)
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ApiResponse<DashboardSummary>, ApiError> {
    user.require_permission("dashboard:read")?;

    let now = Utc::now();
    let flats = FlatRepository::new(state.pool.clone());
    let bills = BillRepository::new(state.pool.clone());
    let issues = IssueRepository::new(state.pool.clone());
    let mut summary = DashboardSummary::empty(user.role, now);

    match user.role {
        Role::Secretary => {
            summary.flats = Some(flat_metrics(&flats.count_by_occupancy().await?));
            summary.bills = Some(bill_metrics(&bills.totals_by_status(None).await?));
            summary.open_issues = Some(issues.count_open(None).await?);
            summary.pending_visitors = Some(pending_visitors(&state, None).await?);
            let alerts = LeaseLifecycleService::from_config(state.pool.clone(), &state.config.jobs)
                .compute_lease_alerts(now)
                .await?;
            summary.lease_alerts = Some(alerts.counts());
        }
        Role::Owner | Role::Tenant => {
            summary.bills = Some(bill_metrics(&bills.totals_by_status(Some(user.id)).await?));
            summary.open_issues = Some(issues.count_open(Some(user.id)).await?);
            summary.pending_visitors = Some(pending_visitors(&state, Some(user.id)).await?);
        }
        Role::Staff => {
            summary.flats = Some(flat_metrics(&flats.count_by_occupancy().await?));
            summary.open_issues = Some(issues.count_open(None).await?);
        }
        Role::Guard => {
            summary.flats = Some(flat_metrics(&flats.count_by_occupancy().await?));
            summary.pending_visitors = Some(pending_visitors(&state, None).await?);
        }
    }

    Ok(ApiResponse::ok(summary))
}
