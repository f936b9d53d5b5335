//! Issue entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Issue, IssuePriority, IssueStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the issues table.
#[derive(Debug, Clone, FromRow)]
pub struct IssueEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub reporter_id: Uuid,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IssueEntity> for Issue {
    fn from(entity: IssueEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            category: entity.category,
            priority: entity.priority.parse().unwrap_or(IssuePriority::Medium),
            status: entity.status.parse().unwrap_or(IssueStatus::Open),
            reporter_id: entity.reporter_id,
            resolution: entity.resolution,
            resolved_at: entity.resolved_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
