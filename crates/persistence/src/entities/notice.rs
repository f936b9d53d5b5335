//! Notice entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Notice;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notices table.
#[derive(Debug, Clone, FromRow)]
pub struct NoticeEntity {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub target_roles: Vec<String>,
    pub author_id: Uuid,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NoticeEntity> for Notice {
    fn from(entity: NoticeEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            is_pinned: entity.is_pinned,
            // Unknown role names are dropped rather than widening the audience
            target_roles: entity
                .target_roles
                .iter()
                .filter_map(|role| role.parse().ok())
                .collect(),
            author_id: entity.author_id,
            expiry_date: entity.expiry_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
