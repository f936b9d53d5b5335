//! Notice board domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use uuid::Uuid;
use validator::Validate;

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    /// Roles the notice is addressed to. Empty means everyone.
    pub target_roles: Vec<Role>,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now)
    }

    pub fn targets(&self, role: Role) -> bool {
        self.target_roles.is_empty() || self.target_roles.contains(&role)
    }

    /// Secretaries see every notice; everyone else only active, unexpired
    /// notices addressed to their role.
    pub fn visible_to(&self, role: Role, now: DateTime<Utc>) -> bool {
        role == Role::Secretary || (self.is_active && !self.is_expired(now) && self.targets(role))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "content must be 1-5000 characters"))]
    pub content: String,

    #[serde(default)]
    pub is_pinned: bool,

    #[serde(default)]
    pub target_roles: Vec<Role>,

    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoticeRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "content must be 1-5000 characters"))]
    pub content: Option<String>,

    pub is_pinned: Option<bool>,

    pub target_roles: Option<Vec<Role>>,

    pub expiry_date: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNoticesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub is_pinned: Option<bool>,
}

impl ListNoticesQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
