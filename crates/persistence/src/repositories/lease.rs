//! Lease repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::LeaseEntity;
use crate::metrics::QueryTimer;

/// Input data for inserting a lease.
#[derive(Debug, Clone)]
pub struct NewLease {
    pub flat_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub monthly_rent: f64,
    pub security_deposit: f64,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct LeaseUpdate {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub monthly_rent: Option<f64>,
    pub security_deposit: Option<f64>,
    pub is_active: Option<bool>,
}

/// Filters for listing leases.
#[derive(Debug, Clone, Default)]
pub struct LeaseFilter {
    pub flat_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Restricts to leases where the user is the tenant or owns the flat.
    pub party_id: Option<Uuid>,
}

/// Repository for lease database operations.
#[derive(Clone)]
pub struct LeaseRepository {
    pool: PgPool,
}

impl LeaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_lease_by_id");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT id, flat_id, tenant_id, start_date, end_date,
                   monthly_rent::FLOAT8 AS monthly_rent,
                   security_deposit::FLOAT8 AS security_deposit,
                   is_active, created_at, updated_at
            FROM leases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, input: NewLease) -> Result<LeaseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_lease");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            INSERT INTO leases (flat_id, tenant_id, start_date, end_date, monthly_rent, security_deposit)
            VALUES ($1, $2, $3, $4, $5::NUMERIC, $6::NUMERIC)
            RETURNING id, flat_id, tenant_id, start_date, end_date,
                      monthly_rent::FLOAT8 AS monthly_rent,
                      security_deposit::FLOAT8 AS security_deposit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(input.flat_id)
        .bind(input.tenant_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.monthly_rent)
        .bind(input.security_deposit)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: LeaseUpdate,
    ) -> Result<Option<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_lease");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            UPDATE leases
            SET start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                monthly_rent = COALESCE($4::NUMERIC, monthly_rent),
                security_deposit = COALESCE($5::NUMERIC, security_deposit),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, flat_id, tenant_id, start_date, end_date,
                      monthly_rent::FLOAT8 AS monthly_rent,
                      security_deposit::FLOAT8 AS security_deposit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.monthly_rent)
        .bind(update.security_deposit)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deactivate a lease early. The end date is pulled in to `now` when it
    /// lies in the future. Returns `None` if the lease is missing or already inactive.
    pub async fn terminate(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("terminate_lease");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            UPDATE leases
            SET is_active = FALSE,
                end_date = GREATEST(start_date + INTERVAL '1 second', LEAST(end_date, $2)),
                updated_at = NOW()
            WHERE id = $1 AND is_active
            RETURNING id, flat_id, tenant_id, start_date, end_date,
                      monthly_rent::FLOAT8 AS monthly_rent,
                      security_deposit::FLOAT8 AS security_deposit,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_lease");
        let result = sqlx::query("DELETE FROM leases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Active leases on the flat whose closed date range intersects `[start, end]`.
    pub async fn find_overlapping(
        &self,
        flat_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_overlapping_leases");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT id, flat_id, tenant_id, start_date, end_date,
                   monthly_rent::FLOAT8 AS monthly_rent,
                   security_deposit::FLOAT8 AS security_deposit,
                   is_active, created_at, updated_at
            FROM leases
            WHERE flat_id = $1
              AND is_active
              AND start_date <= $3
              AND end_date >= $2
              AND ($4::UUID IS NULL OR id <> $4)
            "#,
        )
        .bind(flat_id)
        .bind(start)
        .bind(end)
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Leases on the flat still flagged active, most recently created first.
    pub async fn find_active_for_flat(&self, flat_id: Uuid) -> Result<Vec<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_leases_for_flat");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT id, flat_id, tenant_id, start_date, end_date,
                   monthly_rent::FLOAT8 AS monthly_rent,
                   security_deposit::FLOAT8 AS security_deposit,
                   is_active, created_at, updated_at
            FROM leases
            WHERE flat_id = $1 AND is_active
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(flat_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Leases still flagged active whose end date has passed.
    pub async fn find_expired_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_expired_active_leases");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT id, flat_id, tenant_id, start_date, end_date,
                   monthly_rent::FLOAT8 AS monthly_rent,
                   security_deposit::FLOAT8 AS security_deposit,
                   is_active, created_at, updated_at
            FROM leases
            WHERE is_active AND end_date < $1
            ORDER BY end_date ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Clear the active flag if the lease is still active and past its end.
    ///
    /// Returns `false` when another writer got there first.
    pub async fn deactivate_if_expired(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_expired_lease");
        let result = sqlx::query(
            r#"
            UPDATE leases
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active AND end_date < $2
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Active leases ending on or before `cutoff`, including already-past ones.
    pub async fn find_active_ending_by(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_leases_ending_by");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT id, flat_id, tenant_id, start_date, end_date,
                   monthly_rent::FLOAT8 AS monthly_rent,
                   security_deposit::FLOAT8 AS security_deposit,
                   is_active, created_at, updated_at
            FROM leases
            WHERE is_active AND end_date <= $1
            ORDER BY end_date ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &LeaseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LeaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_leases");
        let result = sqlx::query_as::<_, LeaseEntity>(
            r#"
            SELECT l.id, l.flat_id, l.tenant_id, l.start_date, l.end_date,
                   l.monthly_rent::FLOAT8 AS monthly_rent,
                   l.security_deposit::FLOAT8 AS security_deposit,
                   l.is_active, l.created_at, l.updated_at
            FROM leases l
            JOIN flats f ON f.id = l.flat_id
            WHERE ($1::UUID IS NULL OR l.flat_id = $1)
              AND ($2::UUID IS NULL OR l.tenant_id = $2)
              AND ($3::BOOLEAN IS NULL OR l.is_active = $3)
              AND ($4::UUID IS NULL OR l.tenant_id = $4 OR f.owner_id = $4)
            ORDER BY l.start_date DESC, l.id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.tenant_id)
        .bind(filter.is_active)
        .bind(filter.party_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &LeaseFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_leases");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM leases l
            JOIN flats f ON f.id = l.flat_id
            WHERE ($1::UUID IS NULL OR l.flat_id = $1)
              AND ($2::UUID IS NULL OR l.tenant_id = $2)
              AND ($3::BOOLEAN IS NULL OR l.is_active = $3)
              AND ($4::UUID IS NULL OR l.tenant_id = $4 OR f.owner_id = $4)
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.tenant_id)
        .bind(filter.is_active)
        .bind(filter.party_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
