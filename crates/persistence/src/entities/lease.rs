//! Lease entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Lease;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the leases table.
///
/// Money columns are NUMERIC and selected as `::FLOAT8`.
#[derive(Debug, Clone, FromRow)]
pub struct LeaseEntity {
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

impl From<LeaseEntity> for Lease {
    fn from(entity: LeaseEntity) -> Self {
        Self {
            id: entity.id,
            flat_id: entity.flat_id,
            tenant_id: entity.tenant_id,
            start_date: entity.start_date,
            end_date: entity.end_date,
            monthly_rent: entity.monthly_rent,
            security_deposit: entity.security_deposit,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
