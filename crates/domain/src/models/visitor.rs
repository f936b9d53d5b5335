//! Visitor log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Approval state derived from the tri-state `is_approved` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorStatus {
    Pending,
    Approved,
    Rejected,
}

impl VisitorStatus {
    pub fn from_approval(is_approved: Option<bool>) -> Self {
        match is_approved {
            None => VisitorStatus::Pending,
            Some(true) => VisitorStatus::Approved,
            Some(false) => VisitorStatus::Rejected,
        }
    }

    /// Value of `is_approved` this status corresponds to.
    pub fn as_approval(&self) -> Option<bool> {
        match self {
            VisitorStatus::Pending => None,
            VisitorStatus::Approved => Some(true),
            VisitorStatus::Rejected => Some(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Pending => "PENDING",
            VisitorStatus::Approved => "APPROVED",
            VisitorStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorLog {
    pub id: Uuid,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub flat_id: Uuid,
    pub purpose: String,
    pub entry_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    /// `None` while pending.
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    pub logged_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VisitorLog {
    pub fn status(&self) -> VisitorStatus {
        VisitorStatus::from_approval(self.is_approved)
    }

    pub fn is_inside(&self) -> bool {
        self.exit_time.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitorRequest {
    #[validate(length(min = 1, max = 100, message = "visitorName must be 1-100 characters"))]
    pub visitor_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub visitor_phone: String,

    pub flat_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "purpose must be 1-200 characters"))]
    pub purpose: String,

    /// Defaults to the time the log is created.
    pub entry_time: Option<DateTime<Utc>>,
}

/// Approval or rejection by a resident of the visited flat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorDecisionRequest {
    pub is_approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVisitorsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub flat_id: Option<Uuid>,
    pub status: Option<VisitorStatus>,
    /// Only visitors who have not logged an exit yet.
    pub inside: Option<bool>,
}

impl ListVisitorsQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
