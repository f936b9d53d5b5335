//! Background job that expires finished leases and refreshes lease alerts.

use std::time::Duration;

use chrono::Utc;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::{record_lease_alerts, record_leases_expired};
use crate::services::LeaseLifecycleService;

pub struct LeaseExpiryJob {
    service: LeaseLifecycleService,
    frequency: JobFrequency,
    alert_timeout: Duration,
}

impl LeaseExpiryJob {
    pub fn new(
        service: LeaseLifecycleService,
        frequency: JobFrequency,
        alert_timeout: Duration,
    ) -> Self {
        Self {
            service,
            frequency,
            alert_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Job for LeaseExpiryJob {
    fn name(&self) -> &'static str {
        "lease_expiry"
    }

    fn frequency(&self) -> JobFrequency {
        self.frequency
    }

    async fn execute(&self) -> Result<(), String> {
        let now = Utc::now();

        let expired = self
            .service
            .auto_expire_leases(now)
            .await
            .map_err(|e| format!("Failed to expire leases: {}", e))?;
        record_leases_expired(expired);
        tracing::info!(job = self.name(), expired, "Expired leases deactivated");

        let alerts = tokio::time::timeout(self.alert_timeout, self.service.compute_lease_alerts(now))
            .await
            .map_err(|_| {
                format!(
                    "Lease alert query timed out after {}s",
                    self.alert_timeout.as_secs()
                )
            })?
            .map_err(|e| format!("Failed to compute lease alerts: {}", e))?;

        let counts = alerts.counts();
        record_lease_alerts(counts.urgent, counts.warning, counts.expired);
        tracing::info!(
            job = self.name(),
            urgent = counts.urgent,
            warning = counts.warning,
            expired = counts.expired,
            "Lease alerts computed"
        );

        Ok(())
    }
}
