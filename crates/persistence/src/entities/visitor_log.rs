//! Visitor log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::VisitorLog;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the visitor_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct VisitorLogEntity {
    pub id: Uuid,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub flat_id: Uuid,
    pub purpose: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub is_approved: Option<bool>,
    pub approved_by_id: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub logged_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitorLogEntity> for VisitorLog {
    fn from(entity: VisitorLogEntity) -> Self {
        Self {
            id: entity.id,
            visitor_name: entity.visitor_name,
            visitor_phone: entity.visitor_phone,
            flat_id: entity.flat_id,
            purpose: entity.purpose,
            entry_time: entity.entry_time,
            exit_time: entity.exit_time,
            is_approved: entity.is_approved,
            approved_by_id: entity.approved_by_id,
            approved_at: entity.approved_at,
            logged_by_id: entity.logged_by_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
