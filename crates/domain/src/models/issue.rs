//! Maintenance issue domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageParams;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl IssuePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "LOW",
            IssuePriority::Medium => "MEDIUM",
            IssuePriority::High => "HIGH",
            IssuePriority::Urgent => "URGENT",
        }
    }
}

impl Default for IssuePriority {
    fn default() -> Self {
        IssuePriority::Medium
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IssuePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(IssuePriority::Low),
            "MEDIUM" => Ok(IssuePriority::Medium),
            "HIGH" => Ok(IssuePriority::High),
            "URGENT" => Ok(IssuePriority::Urgent),
            _ => Err(format!("Invalid issue priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "OPEN",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::Closed => "CLOSED",
        }
    }

    /// Check if transition to target status is valid.
    pub fn can_transition_to(&self, target: IssueStatus) -> bool {
        match (self, target) {
            (IssueStatus::Open, IssueStatus::InProgress) => true,
            (IssueStatus::Open, IssueStatus::Closed) => true,
            (IssueStatus::InProgress, IssueStatus::Resolved) => true,
            (IssueStatus::InProgress, IssueStatus::Closed) => true,
            (IssueStatus::Resolved, IssueStatus::Closed) => true,
            // Reopen
            (IssueStatus::Resolved, IssueStatus::InProgress) => true,
            _ => false,
        }
    }

    /// Still waiting on someone to act.
    pub fn is_open(&self) -> bool {
        matches!(self, IssueStatus::Open | IssueStatus::InProgress)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(IssueStatus::Open),
            "IN_PROGRESS" => Ok(IssueStatus::InProgress),
            "RESOLVED" => Ok(IssueStatus::Resolved),
            "CLOSED" => Ok(IssueStatus::Closed),
            _ => Err(format!(
                "Invalid issue status: {}. Must be one of: OPEN, IN_PROGRESS, RESOLVED, CLOSED",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub reporter_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "description must be 1-5000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "category must be 1-50 characters"))]
    pub category: String,

    #[serde(default)]
    pub priority: IssuePriority,
}

/// Edits to the issue's content. Status changes go through
/// [`UpdateIssueStatusRequest`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "description must be 1-5000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "category must be 1-50 characters"))]
    pub category: Option<String>,

    pub priority: Option<IssuePriority>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueStatusRequest {
    pub status: IssueStatus,

    #[validate(length(max = 2000, message = "resolution must be at most 2000 characters"))]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub category: Option<String>,
    pub reporter_id: Option<Uuid>,
}

impl ListIssuesQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
