//! Flat repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FlatEntity, OccupancyCountRow};
use crate::metrics::QueryTimer;

/// Input data for inserting a flat.
#[derive(Debug, Clone)]
pub struct NewFlat {
    pub flat_number: String,
    pub floor: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub owner_id: Uuid,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct FlatUpdate {
    pub flat_number: Option<String>,
    pub floor: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub owner_id: Option<Uuid>,
}

/// Filters for listing flats.
#[derive(Debug, Clone, Default)]
pub struct FlatFilter {
    pub occupancy_status: Option<String>,
    pub floor: Option<i32>,
    pub owner_id: Option<Uuid>,
    /// Restricts to flats the user owns or holds an active lease on.
    pub resident_id: Option<Uuid>,
}

/// Repository for flat database operations.
#[derive(Clone)]
pub struct FlatRepository {
    pool: PgPool,
}

impl FlatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FlatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_flat_by_id");
        let result = sqlx::query_as::<_, FlatEntity>(
            r#"
            SELECT id, flat_number, floor, bedrooms, bathrooms, area, occupancy_status, owner_id,
                   created_at, updated_at
            FROM flats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a flat. New flats start VACANT.
    pub async fn create(&self, input: NewFlat) -> Result<FlatEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_flat");
        let result = sqlx::query_as::<_, FlatEntity>(
            r#"
            INSERT INTO flats (flat_number, floor, bedrooms, bathrooms, area, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, flat_number, floor, bedrooms, bathrooms, area, occupancy_status, owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(&input.flat_number)
        .bind(input.floor)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.area)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: FlatUpdate,
    ) -> Result<Option<FlatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_flat");
        let result = sqlx::query_as::<_, FlatEntity>(
            r#"
            UPDATE flats
            SET flat_number = COALESCE($2, flat_number),
                floor = COALESCE($3, floor),
                bedrooms = COALESCE($4, bedrooms),
                bathrooms = COALESCE($5, bathrooms),
                area = COALESCE($6, area),
                owner_id = COALESCE($7, owner_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, flat_number, floor, bedrooms, bathrooms, area, occupancy_status, owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.flat_number)
        .bind(update.floor)
        .bind(update.bedrooms)
        .bind(update.bathrooms)
        .bind(update.area)
        .bind(update.owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist a recomputed occupancy label.
    pub async fn set_occupancy(
        &self,
        id: Uuid,
        occupancy_status: &str,
    ) -> Result<Option<FlatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_flat_occupancy");
        let result = sqlx::query_as::<_, FlatEntity>(
            r#"
            UPDATE flats
            SET occupancy_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, flat_number, floor, bedrooms, bathrooms, area, occupancy_status, owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(occupancy_status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a flat together with its leases, bills and visitor logs.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_flat");
        let result = sqlx::query("DELETE FROM flats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Whether the user owns the flat or holds an active lease on it.
    pub async fn is_resident(&self, flat_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_flat_resident");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM flats f
                WHERE f.id = $1
                  AND (f.owner_id = $2
                       OR EXISTS (SELECT 1 FROM leases l
                                  WHERE l.flat_id = f.id AND l.tenant_id = $2 AND l.is_active))
            )
            "#,
        )
        .bind(flat_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &FlatFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FlatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_flats");
        let result = sqlx::query_as::<_, FlatEntity>(
            r#"
            SELECT f.id, f.flat_number, f.floor, f.bedrooms, f.bathrooms, f.area,
                   f.occupancy_status, f.owner_id, f.created_at, f.updated_at
            FROM flats f
            WHERE ($1::TEXT IS NULL OR f.occupancy_status = $1)
              AND ($2::INTEGER IS NULL OR f.floor = $2)
              AND ($3::UUID IS NULL OR f.owner_id = $3)
              AND ($4::UUID IS NULL
                   OR f.owner_id = $4
                   OR EXISTS (SELECT 1 FROM leases l
                              WHERE l.flat_id = f.id AND l.tenant_id = $4 AND l.is_active))
            ORDER BY f.flat_number ASC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&filter.occupancy_status)
        .bind(filter.floor)
        .bind(filter.owner_id)
        .bind(filter.resident_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &FlatFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_flats");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM flats f
            WHERE ($1::TEXT IS NULL OR f.occupancy_status = $1)
              AND ($2::INTEGER IS NULL OR f.floor = $2)
              AND ($3::UUID IS NULL OR f.owner_id = $3)
              AND ($4::UUID IS NULL
                   OR f.owner_id = $4
                   OR EXISTS (SELECT 1 FROM leases l
                              WHERE l.flat_id = f.id AND l.tenant_id = $4 AND l.is_active))
            "#,
        )
        .bind(&filter.occupancy_status)
        .bind(filter.floor)
        .bind(filter.owner_id)
        .bind(filter.resident_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flat counts grouped by occupancy status.
    pub async fn count_by_occupancy(&self) -> Result<Vec<OccupancyCountRow>, sqlx::Error> {
        let timer = QueryTimer::new("count_flats_by_occupancy");
        let result = sqlx::query_as::<_, OccupancyCountRow>(
            r#"
            SELECT occupancy_status, COUNT(*) AS count
            FROM flats
            GROUP BY occupancy_status
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
