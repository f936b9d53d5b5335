//! Notice repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NoticeEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Clone)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub target_roles: Vec<String>,
    pub author_id: Uuid,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NoticeUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
    pub target_roles: Option<Vec<String>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

/// Filters for listing notices.
#[derive(Debug, Clone, Default)]
pub struct NoticeFilter {
    /// When set, only active, unexpired notices addressed to this role
    /// (or to everyone) are returned.
    pub viewer_role: Option<String>,
    pub is_pinned: Option<bool>,
}

/// Repository for notice database operations.
#[derive(Clone)]
pub struct NoticeRepository {
    pool: PgPool,
}

impl NoticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_notice_by_id");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            SELECT id, title, content, is_pinned, target_roles, author_id, expiry_date, is_active,
                   created_at, updated_at
            FROM notices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn create(&self, input: NewNotice) -> Result<NoticeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notice");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            INSERT INTO notices (title, content, is_pinned, target_roles, author_id, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, content, is_pinned, target_roles, author_id, expiry_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.is_pinned)
        .bind(&input.target_roles)
        .bind(input.author_id)
        .bind(input.expiry_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: NoticeUpdate,
    ) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_notice");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            UPDATE notices
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_pinned = COALESCE($4, is_pinned),
                target_roles = COALESCE($5::TEXT[], target_roles),
                expiry_date = COALESCE($6, expiry_date),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, is_pinned, target_roles, author_id, expiry_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.is_pinned)
        .bind(&update.target_roles)
        .bind(update.expiry_date)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip the pinned flag.
    pub async fn toggle_pin(&self, id: Uuid) -> Result<Option<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("toggle_notice_pin");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            UPDATE notices
            SET is_pinned = NOT is_pinned, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, is_pinned, target_roles, author_id, expiry_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_notice");
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Pinned notices first, then newest first.
    pub async fn list(
        &self,
        filter: &NoticeFilter,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notices");
        let result = sqlx::query_as::<_, NoticeEntity>(
            r#"
            SELECT id, title, content, is_pinned, target_roles, author_id, expiry_date, is_active,
                   created_at, updated_at
            FROM notices
            WHERE ($1::TEXT IS NULL
                   OR (is_active
                       AND (expiry_date IS NULL OR expiry_date > $2)
                       AND (cardinality(target_roles) = 0 OR $1 = ANY(target_roles))))
              AND ($3::BOOLEAN IS NULL OR is_pinned = $3)
            ORDER BY is_pinned DESC, created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&filter.viewer_role)
        .bind(now)
        .bind(filter.is_pinned)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &NoticeFilter, now: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_notices");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notices
            WHERE ($1::TEXT IS NULL
                   OR (is_active
                       AND (expiry_date IS NULL OR expiry_date > $2)
                       AND (cardinality(target_roles) = 0 OR $1 = ANY(target_roles))))
              AND ($3::BOOLEAN IS NULL OR is_pinned = $3)
            "#,
        )
        .bind(&filter.viewer_role)
        .bind(now)
        .bind(filter.is_pinned)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
