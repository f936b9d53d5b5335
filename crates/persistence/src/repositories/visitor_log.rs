//! Visitor log repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::VisitorLogEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Clone)]
pub struct NewVisitorLog {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub flat_id: Uuid,
    pub purpose: String,
    pub entry_time: DateTime<Utc>,
    pub logged_by_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct VisitorLogFilter {
    pub flat_id: Option<Uuid>,
    /// Filter on the tri-state approval column. Ignored unless `filter_approval`.
    pub is_approved: Option<bool>,
    pub filter_approval: bool,
    /// Only visitors without an exit time.
    pub inside_only: bool,
    /// Restricts to flats the user owns or holds an active lease on.
    pub resident_id: Option<Uuid>,
}

/// Repository for visitor log database operations.
#[derive(Clone)]
pub struct VisitorLogRepository {
    pool: PgPool,
}

impl VisitorLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VisitorLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visitor_log_by_id");
        let result = sqlx::query_as::<_, VisitorLogEntity>(
            r#"
            SELECT id, visitor_name, visitor_phone, flat_id, purpose, entry_time, exit_time,
                   is_approved, approved_by_id, approved_at, logged_by_id, created_at, updated_at
            FROM visitor_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, input: NewVisitorLog) -> Result<VisitorLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_visitor_log");
        let result = sqlx::query_as::<_, VisitorLogEntity>(
            r#"
            INSERT INTO visitor_logs (visitor_name, visitor_phone, flat_id, purpose, entry_time, logged_by_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, visitor_name, visitor_phone, flat_id, purpose, entry_time, exit_time,
                      is_approved, approved_by_id, approved_at, logged_by_id, created_at, updated_at
            "#,
        )
        .bind(&input.visitor_name)
        .bind(&input.visitor_phone)
        .bind(input.flat_id)
        .bind(&input.purpose)
        .bind(input.entry_time)
        .bind(input.logged_by_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record an approval or rejection with who decided and when.
    pub async fn set_decision(
        &self,
        id: Uuid,
        is_approved: bool,
        decided_by: Uuid,
        decided_at: DateTime<Utc>,
    ) -> Result<Option<VisitorLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_visitor_decision");
        let result = sqlx::query_as::<_, VisitorLogEntity>(
            r#"
            UPDATE visitor_logs
            SET is_approved = $2, approved_by_id = $3, approved_at = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, visitor_name, visitor_phone, flat_id, purpose, entry_time, exit_time,
                      is_approved, approved_by_id, approved_at, logged_by_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(is_approved)
        .bind(decided_by)
        .bind(decided_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Log the visitor's exit. Returns `None` if missing or already exited.
    pub async fn mark_exit(
        &self,
        id: Uuid,
        exit_time: DateTime<Utc>,
    ) -> Result<Option<VisitorLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_visitor_exit");
        let result = sqlx::query_as::<_, VisitorLogEntity>(
            r#"
            UPDATE visitor_logs
            SET exit_time = GREATEST($2, entry_time), updated_at = NOW()
            WHERE id = $1 AND exit_time IS NULL
            RETURNING id, visitor_name, visitor_phone, flat_id, purpose, entry_time, exit_time,
                      is_approved, approved_by_id, approved_at, logged_by_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(exit_time)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_visitor_log");
        let result = sqlx::query("DELETE FROM visitor_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn list(
        &self,
        filter: &VisitorLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VisitorLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visitor_logs");
        let result = sqlx::query_as::<_, VisitorLogEntity>(
            r#"
            SELECT v.id, v.visitor_name, v.visitor_phone, v.flat_id, v.purpose, v.entry_time,
                   v.exit_time, v.is_approved, v.approved_by_id, v.approved_at, v.logged_by_id,
                   v.created_at, v.updated_at
            FROM visitor_logs v
            JOIN flats f ON f.id = v.flat_id
            WHERE ($1::UUID IS NULL OR v.flat_id = $1)
              AND (NOT $2 OR v.is_approved IS NOT DISTINCT FROM $3::BOOLEAN)
              AND (NOT $4 OR v.exit_time IS NULL)
              AND ($5::UUID IS NULL
                   OR f.owner_id = $5
                   OR EXISTS (SELECT 1 FROM leases l
                              WHERE l.flat_id = f.id AND l.tenant_id = $5 AND l.is_active))
            ORDER BY v.entry_time DESC, v.id DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.filter_approval)
        .bind(filter.is_approved)
        .bind(filter.inside_only)
        .bind(filter.resident_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &VisitorLogFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_visitor_logs");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM visitor_logs v
            JOIN flats f ON f.id = v.flat_id
            WHERE ($1::UUID IS NULL OR v.flat_id = $1)
              AND (NOT $2 OR v.is_approved IS NOT DISTINCT FROM $3::BOOLEAN)
              AND (NOT $4 OR v.exit_time IS NULL)
              AND ($5::UUID IS NULL
                   OR f.owner_id = $5
                   OR EXISTS (SELECT 1 FROM leases l
                              WHERE l.flat_id = f.id AND l.tenant_id = $5 AND l.is_active))
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.filter_approval)
        .bind(filter.is_approved)
        .bind(filter.inside_only)
        .bind(filter.resident_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
