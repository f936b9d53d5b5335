//! Repository implementations for database operations.

pub mod bill;
pub mod flat;
pub mod issue;
pub mod lease;
pub mod notice;
pub mod user;
pub mod visitor_log;

pub use bill::{BillFilter, BillRepository, BillUpdate, NewBill};
pub use flat::{FlatFilter, FlatRepository, FlatUpdate, NewFlat};
pub use issue::{IssueFilter, IssueRepository, IssueUpdate, NewIssue};
pub use lease::{LeaseFilter, LeaseRepository, LeaseUpdate, NewLease};
pub use notice::{NewNotice, NoticeFilter, NoticeRepository, NoticeUpdate};
pub use user::{NewUser, UserFilter, UserRepository, UserUpdate};
pub use visitor_log::{NewVisitorLog, VisitorLogFilter, VisitorLogRepository};
