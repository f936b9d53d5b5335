//! Domain models for the apartment manager.

pub mod bill;
pub mod dashboard;
pub mod flat;
pub mod issue;
pub mod lease;
pub mod notice;
pub mod role;
pub mod user;
pub mod visitor;

pub use bill::{Bill, BillStatus, BillType};
pub use dashboard::DashboardSummary;
pub use flat::{Flat, OccupancyStatus};
pub use issue::{Issue, IssuePriority, IssueStatus};
pub use lease::Lease;
pub use notice::Notice;
pub use role::Role;
pub use user::User;
pub use visitor::{VisitorLog, VisitorStatus};
