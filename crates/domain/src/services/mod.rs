//! Pure domain services.
//!
//! Nothing here touches the database; callers load rows and pass them in.

pub mod access_control;
pub mod lease_alerts;
pub mod occupancy;

pub use access_control::{has_min_role, has_permission, owns_resource, scope_for, Scope};
pub use lease_alerts::{bucket_lease_alerts, AlertWindows, LeaseAlert, LeaseAlerts};
pub use occupancy::{assign_payer, occupancy_for, responsible_party, select_current_lease, BillParty};
