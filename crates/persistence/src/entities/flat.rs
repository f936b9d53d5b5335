//! Flat entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Flat, OccupancyStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the flats table.
#[derive(Debug, Clone, FromRow)]
pub struct FlatEntity {
    pub id: Uuid,
    pub flat_number: String,
    pub floor: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub occupancy_status: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FlatEntity> for Flat {
    fn from(entity: FlatEntity) -> Self {
        Self {
            id: entity.id,
            flat_number: entity.flat_number,
            floor: entity.floor,
            bedrooms: entity.bedrooms,
            bathrooms: entity.bathrooms,
            area: entity.area,
            occupancy_status: entity
                .occupancy_status
                .parse()
                .unwrap_or(OccupancyStatus::Vacant),
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Row of a `GROUP BY occupancy_status` count.
#[derive(Debug, Clone, FromRow)]
pub struct OccupancyCountRow {
    pub occupancy_status: String,
    pub count: i64,
}
