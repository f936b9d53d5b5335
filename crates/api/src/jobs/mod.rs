//! Background job scheduler and job implementations.

mod lease_expiry;
mod overdue_bills;
mod scheduler;

pub use lease_expiry::LeaseExpiryJob;
pub use overdue_bills::OverdueBillsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};

use std::time::Duration;

use sqlx::PgPool;

use crate::config::JobsConfig;
use crate::services::LeaseLifecycleService;

/// Scheduler with the lease expiry and overdue bill jobs registered.
pub fn build_scheduler(pool: PgPool, config: &JobsConfig) -> JobScheduler {
    let mut scheduler = JobScheduler::new(Duration::from_secs(config.initial_delay_secs));

    scheduler.register(LeaseExpiryJob::new(
        LeaseLifecycleService::from_config(pool.clone(), config),
        JobFrequency::from_minutes(config.lease_expiry_interval_mins),
        Duration::from_secs(config.alert_query_timeout_secs),
    ));
    scheduler.register(OverdueBillsJob::new(
        pool,
        JobFrequency::from_minutes(config.overdue_bills_interval_mins),
    ));

    scheduler
}
