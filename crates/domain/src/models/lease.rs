//! Lease domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A rental agreement between a flat and a tenant.
///
/// `is_active` is the administrative flag cleared on termination or expiry.
/// A lease is *currently active* only while the flag is set and `now` falls
/// inside `[start_date, end_date]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: Uuid,
    pub flat_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lease {
    pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    /// Closed-interval overlap with `[start, end]`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Flagged active but already past its end date.
    pub fn is_overdue_for_expiry(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_date < now
    }
}

fn validate_create_dates(req: &CreateLeaseRequest) -> Result<(), ValidationError> {
    validate_date_order(req.start_date, req.end_date)
}

/// Rejects a range whose end is not after its start.
pub fn validate_date_order(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end > start {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_order");
        err.message = Some("endDate must be after startDate".into());
        Err(err)
    }
}

/// Request payload for creating a lease.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateLeaseRequest {
    pub flat_id: Uuid,

    pub tenant_id: Uuid,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[validate(range(exclusive_min = 0.0, message = "monthlyRent must be greater than zero"))]
    pub monthly_rent: f64,

    #[validate(range(min = 0.0, message = "securityDeposit must not be negative"))]
    pub security_deposit: f64,
}

/// Request payload for updating a lease.
///
/// Date order is checked against the merged lease by the service, since
/// either bound may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaseRequest {
    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    #[validate(range(exclusive_min = 0.0, message = "monthlyRent must be greater than zero"))]
    pub monthly_rent: Option<f64>,

    #[validate(range(min = 0.0, message = "securityDeposit must not be negative"))]
    pub security_deposit: Option<f64>,

    pub is_active: Option<bool>,
}

/// Query parameters for listing leases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeasesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub flat_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl ListLeasesQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
