//! Issue repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::IssueEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub reporter_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub reporter_id: Option<Uuid>,
}

/// Repository for issue database operations.
#[derive(Clone)]
pub struct IssueRepository {
    pool: PgPool,
}

impl IssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IssueEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_issue_by_id");
        let result = sqlx::query_as::<_, IssueEntity>(
            r#"
            SELECT id, title, description, category, priority, status, reporter_id, resolution,
                   resolved_at, created_at, updated_at
            FROM issues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, input: NewIssue) -> Result<IssueEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_issue");
        let result = sqlx::query_as::<_, IssueEntity>(
            r#"
            INSERT INTO issues (title, description, category, priority, reporter_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, category, priority, status, reporter_id, resolution,
                      resolved_at, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.priority)
        .bind(input.reporter_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: IssueUpdate,
    ) -> Result<Option<IssueEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_issue");
        let result = sqlx::query_as::<_, IssueEntity>(
            r#"
            UPDATE issues
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, category, priority, status, reporter_id, resolution,
                      resolved_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.category)
        .bind(&update.priority)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move the issue from `from_status` to `to_status`.
    ///
    /// Returns `None` if the issue changed status in the meantime.
    pub async fn transition_status(
        &self,
        id: Uuid,
        from_status: &str,
        to_status: &str,
        resolution: Option<&str>,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Option<IssueEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_issue_status");
        let result = sqlx::query_as::<_, IssueEntity>(
            r#"
            UPDATE issues
            SET status = $3,
                resolution = COALESCE($4, resolution),
                resolved_at = $5,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id, title, description, category, priority, status, reporter_id, resolution,
                      resolved_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(from_status)
        .bind(to_status)
        .bind(resolution)
        .bind(resolved_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_issue");
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn list(
        &self,
        filter: &IssueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IssueEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_issues");
        let result = sqlx::query_as::<_, IssueEntity>(
            r#"
            SELECT id, title, description, category, priority, status, reporter_id, resolution,
                   resolved_at, created_at, updated_at
            FROM issues
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR priority = $2)
              AND ($3::TEXT IS NULL OR category = $3)
              AND ($4::UUID IS NULL OR reporter_id = $4)
            ORDER BY created_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.priority)
        .bind(&filter.category)
        .bind(filter.reporter_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &IssueFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_issues");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM issues
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR priority = $2)
              AND ($3::TEXT IS NULL OR category = $3)
              AND ($4::UUID IS NULL OR reporter_id = $4)
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.priority)
        .bind(&filter.category)
        .bind(filter.reporter_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// OPEN and IN_PROGRESS issues, optionally for a single reporter.
    pub async fn count_open(&self, reporter_id: Option<Uuid>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_open_issues");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM issues
            WHERE status IN ('OPEN', 'IN_PROGRESS')
              AND ($1::UUID IS NULL OR reporter_id = $1)
            "#,
        )
        .bind(reporter_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
