//! Application services wiring domain policy to the data store.

pub mod auth;
pub mod bootstrap;
pub mod lease_lifecycle;
pub mod occupancy;

pub use auth::{AuthError, AuthService};
pub use bootstrap::bootstrap_secretary;
pub use lease_lifecycle::LeaseLifecycleService;
pub use occupancy::{OccupancyService, PolicyError};
