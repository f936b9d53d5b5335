//! Bill entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Bill, BillStatus, BillType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the bills table.
#[derive(Debug, Clone, FromRow)]
pub struct BillEntity {
    pub id: Uuid,
    pub flat_id: Uuid,
    pub user_id: Uuid,
    pub bill_type: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub paid_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BillEntity> for Bill {
    fn from(entity: BillEntity) -> Self {
        Self {
            id: entity.id,
            flat_id: entity.flat_id,
            user_id: entity.user_id,
            bill_type: entity.bill_type.parse().unwrap_or(BillType::Maintenance),
            amount: entity.amount,
            due_date: entity.due_date,
            status: entity.status.parse().unwrap_or(BillStatus::Due),
            paid_date: entity.paid_date,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Row of a `GROUP BY status` aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct BillStatusTotalRow {
    pub status: String,
    pub count: i64,
    pub total_amount: f64,
}
