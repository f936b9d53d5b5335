//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Enum columns are stored as
//! TEXT and parsed when converting into domain models.

pub mod bill;
pub mod flat;
pub mod issue;
pub mod lease;
pub mod notice;
pub mod user;
pub mod visitor_log;

pub use bill::{BillEntity, BillStatusTotalRow};
pub use flat::{FlatEntity, OccupancyCountRow};
pub use issue::IssueEntity;
pub use lease::LeaseEntity;
pub use notice::NoticeEntity;
pub use user::UserEntity;
pub use visitor_log::VisitorLogEntity;
