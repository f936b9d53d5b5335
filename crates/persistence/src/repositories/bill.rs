//! Bill repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BillEntity, BillStatusTotalRow};
use crate::metrics::QueryTimer;

/// Input data for inserting a bill. The payer is already resolved.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub flat_id: Uuid,
    pub user_id: Uuid,
    pub bill_type: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct BillUpdate {
    pub amount: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Filters for listing bills.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub flat_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
    pub bill_type: Option<String>,
    /// Restricts to bills the user pays or that belong to a flat they own.
    pub party_id: Option<Uuid>,
}

/// Repository for bill database operations.
#[derive(Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BillEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_bill_by_id");
        let result = sqlx::query_as::<_, BillEntity>(
            r#"
            SELECT id, flat_id, user_id, bill_type, amount::FLOAT8 AS amount, due_date, status,
                   paid_date, description, created_at, updated_at
            FROM bills
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, input: NewBill) -> Result<BillEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_bill");
        let result = sqlx::query_as::<_, BillEntity>(
            r#"
            INSERT INTO bills (flat_id, user_id, bill_type, amount, due_date, description)
            VALUES ($1, $2, $3, $4::NUMERIC, $5, $6)
            RETURNING id, flat_id, user_id, bill_type, amount::FLOAT8 AS amount, due_date, status,
                      paid_date, description, created_at, updated_at
            "#,
        )
        .bind(input.flat_id)
        .bind(input.user_id)
        .bind(&input.bill_type)
        .bind(input.amount)
        .bind(input.due_date)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an unpaid bill. Returns `None` if the bill is missing or already PAID.
    pub async fn update_unpaid(
        &self,
        id: Uuid,
        update: BillUpdate,
    ) -> Result<Option<BillEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_bill");
        let result = sqlx::query_as::<_, BillEntity>(
            r#"
            UPDATE bills
            SET amount = COALESCE($2::NUMERIC, amount),
                due_date = COALESCE($3, due_date),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'PAID'
            RETURNING id, flat_id, user_id, bill_type, amount::FLOAT8 AS amount, due_date, status,
                      paid_date, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.amount)
        .bind(update.due_date)
        .bind(&update.description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_bill");
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Mark a DUE or OVERDUE bill as PAID.
    ///
    /// Conditional on the current status so a concurrent overdue sweep
    /// (which only touches DUE rows) can never undo a payment. Returns `None`
    /// if the bill is missing or already PAID.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<BillEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_bill_paid");
        let result = sqlx::query_as::<_, BillEntity>(
            r#"
            UPDATE bills
            SET status = 'PAID', paid_date = $2, updated_at = NOW()
            WHERE id = $1 AND status <> 'PAID'
            RETURNING id, flat_id, user_id, bill_type, amount::FLOAT8 AS amount, due_date, status,
                      paid_date, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(paid_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip every DUE bill past its due date to OVERDUE in one statement.
    ///
    /// Returns the number of bills updated; a second run with the same `now`
    /// updates nothing.
    pub async fn mark_overdue(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_bills_overdue");
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET status = 'OVERDUE', updated_at = NOW()
            WHERE status = 'DUE' AND due_date < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    pub async fn list(
        &self,
        filter: &BillFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BillEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_bills");
        let result = sqlx::query_as::<_, BillEntity>(
            r#"
            SELECT b.id, b.flat_id, b.user_id, b.bill_type, b.amount::FLOAT8 AS amount,
                   b.due_date, b.status, b.paid_date, b.description, b.created_at, b.updated_at
            FROM bills b
            JOIN flats f ON f.id = b.flat_id
            WHERE ($1::UUID IS NULL OR b.flat_id = $1)
              AND ($2::UUID IS NULL OR b.user_id = $2)
              AND ($3::TEXT IS NULL OR b.status = $3)
              AND ($4::TEXT IS NULL OR b.bill_type = $4)
              AND ($5::UUID IS NULL OR b.user_id = $5 OR f.owner_id = $5)
            ORDER BY b.due_date DESC, b.id DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.user_id)
        .bind(&filter.status)
        .bind(&filter.bill_type)
        .bind(filter.party_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &BillFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_bills");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM bills b
            JOIN flats f ON f.id = b.flat_id
            WHERE ($1::UUID IS NULL OR b.flat_id = $1)
              AND ($2::UUID IS NULL OR b.user_id = $2)
              AND ($3::TEXT IS NULL OR b.status = $3)
              AND ($4::TEXT IS NULL OR b.bill_type = $4)
              AND ($5::UUID IS NULL OR b.user_id = $5 OR f.owner_id = $5)
            "#,
        )
        .bind(filter.flat_id)
        .bind(filter.user_id)
        .bind(&filter.status)
        .bind(&filter.bill_type)
        .bind(filter.party_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count and amount per status, optionally for a single payer.
    pub async fn totals_by_status(
        &self,
        payer_id: Option<Uuid>,
    ) -> Result<Vec<BillStatusTotalRow>, sqlx::Error> {
        let timer = QueryTimer::new("bill_totals_by_status");
        let result = sqlx::query_as::<_, BillStatusTotalRow>(
            r#"
            SELECT status, COUNT(*) AS count, COALESCE(SUM(amount), 0)::FLOAT8 AS total_amount
            FROM bills
            WHERE ($1::UUID IS NULL OR user_id = $1)
            GROUP BY status
            "#,
        )
        .bind(payer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
