//! Role-shaped dashboard summary models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::role::Role;

/// Flat counts by occupancy status.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatMetrics {
    pub total: i64,
    pub vacant: i64,
    pub owner_occupied: i64,
    pub tenant_occupied: i64,
}

/// Bill counts and outstanding amount.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillMetrics {
    pub due: i64,
    pub overdue: i64,
    pub paid: i64,
    /// Sum of DUE and OVERDUE amounts.
    pub outstanding_amount: f64,
}

/// Lease alert bucket sizes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseAlertCounts {
    pub urgent: usize,
    pub warning: usize,
    pub expired: usize,
}

/// Dashboard payload. Sections the caller's role has no access to are omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flats: Option<FlatMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bills: Option<BillMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_visitors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_alerts: Option<LeaseAlertCounts>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardSummary {
    pub fn empty(role: Role, generated_at: DateTime<Utc>) -> Self {
        Self {
            role,
            flats: None,
            bills: None,
            open_issues: None,
            pending_visitors: None,
            lease_alerts: None,
            generated_at,
        }
    }
}
