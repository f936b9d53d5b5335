//! Bill domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Bill Type
// ============================================================================

/// Category of a bill. Determines who pays it on a leased flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillType {
    Rent,
    Electricity,
    Water,
    Maintenance,
    Parking,
    Penalty,
}

impl BillType {
    pub const ALL: [BillType; 6] = [
        BillType::Rent,
        BillType::Electricity,
        BillType::Water,
        BillType::Maintenance,
        BillType::Parking,
        BillType::Penalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Rent => "RENT",
            BillType::Electricity => "ELECTRICITY",
            BillType::Water => "WATER",
            BillType::Maintenance => "MAINTENANCE",
            BillType::Parking => "PARKING",
            BillType::Penalty => "PENALTY",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BillType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RENT" => Ok(BillType::Rent),
            "ELECTRICITY" => Ok(BillType::Electricity),
            "WATER" => Ok(BillType::Water),
            "MAINTENANCE" => Ok(BillType::Maintenance),
            "PARKING" => Ok(BillType::Parking),
            "PENALTY" => Ok(BillType::Penalty),
            _ => Err(format!("Invalid bill type: {}", s)),
        }
    }
}

// ============================================================================
// Bill Status
// ============================================================================

/// Payment state of a bill. PAID is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Due,
    Paid,
    Overdue,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Due => "DUE",
            BillStatus::Paid => "PAID",
            BillStatus::Overdue => "OVERDUE",
        }
    }

    /// Check if transition to target status is valid.
    pub fn can_transition_to(&self, target: BillStatus) -> bool {
        matches!(
            (self, target),
            (BillStatus::Due, BillStatus::Overdue)
                | (BillStatus::Due, BillStatus::Paid)
                | (BillStatus::Overdue, BillStatus::Paid)
        )
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DUE" => Ok(BillStatus::Due),
            "PAID" => Ok(BillStatus::Paid),
            "OVERDUE" => Ok(BillStatus::Overdue),
            _ => Err(format!(
                "Invalid bill status: {}. Must be one of: DUE, PAID, OVERDUE",
                s
            )),
        }
    }
}

// ============================================================================
// Core Model
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub flat_id: Uuid,
    /// Assigned payer.
    pub user_id: Uuid,
    pub bill_type: BillType,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: BillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// A DUE bill whose due date has passed.
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.status == BillStatus::Due && self.due_date < now
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request payload for creating a bill.
///
/// The payer is not part of the request: it is assigned from the flat's
/// ownership and current lease.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub flat_id: Uuid,

    pub bill_type: BillType,

    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than zero"))]
    pub amount: f64,

    pub due_date: DateTime<Utc>,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request payload for updating an unpaid bill.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than zero"))]
    pub amount: Option<f64>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Query parameters for listing bills.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBillsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub flat_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<BillStatus>,
    pub bill_type: Option<BillType>,
}

impl ListBillsQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
