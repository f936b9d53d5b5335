//! Flat domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Occupancy label derived from the flat's currently active leases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyStatus {
    /// Initial state of a flat that has never been recomputed.
    Vacant,
    OwnerOccupied,
    TenantOccupied,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyStatus::Vacant => "VACANT",
            OccupancyStatus::OwnerOccupied => "OWNER_OCCUPIED",
            OccupancyStatus::TenantOccupied => "TENANT_OCCUPIED",
        }
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OccupancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VACANT" => Ok(OccupancyStatus::Vacant),
            "OWNER_OCCUPIED" => Ok(OccupancyStatus::OwnerOccupied),
            "TENANT_OCCUPIED" => Ok(OccupancyStatus::TenantOccupied),
            _ => Err(format!("Invalid occupancy status: {}", s)),
        }
    }
}

/// Represents a flat in the building.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    pub id: Uuid,
    pub flat_number: String,
    pub floor: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub occupancy_status: OccupancyStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a flat.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlatRequest {
    #[validate(custom(function = "shared::validation::validate_flat_number"))]
    pub flat_number: String,

    #[validate(range(min = 0, max = 200, message = "floor must be between 0 and 200"))]
    pub floor: i32,

    #[validate(range(min = 0, max = 20, message = "bedrooms must be between 0 and 20"))]
    pub bedrooms: i32,

    #[validate(range(min = 0, max = 20, message = "bathrooms must be between 0 and 20"))]
    pub bathrooms: i32,

    #[validate(range(exclusive_min = 0.0, message = "area must be greater than zero"))]
    pub area: f64,

    pub owner_id: Uuid,
}

/// Request payload for updating a flat.
///
/// Occupancy is derived from leases and cannot be set directly.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlatRequest {
    #[validate(custom(function = "shared::validation::validate_flat_number"))]
    pub flat_number: Option<String>,

    #[validate(range(min = 0, max = 200, message = "floor must be between 0 and 200"))]
    pub floor: Option<i32>,

    #[validate(range(min = 0, max = 20, message = "bedrooms must be between 0 and 20"))]
    pub bedrooms: Option<i32>,

    #[validate(range(min = 0, max = 20, message = "bathrooms must be between 0 and 20"))]
    pub bathrooms: Option<i32>,

    #[validate(range(exclusive_min = 0.0, message = "area must be greater than zero"))]
    pub area: Option<f64>,

    pub owner_id: Option<Uuid>,
}

/// Query parameters for listing flats.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFlatsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub occupancy_status: Option<OccupancyStatus>,
    pub floor: Option<i32>,
    pub owner_id: Option<Uuid>,
}

impl ListFlatsQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Response for an occupancy recomputation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    pub flat_id: Uuid,
    pub occupancy_status: OccupancyStatus,
}
