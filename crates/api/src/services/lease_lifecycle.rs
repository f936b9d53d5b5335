//! Lease expiry and alert computation used by the lease job and the alerts endpoint.

use chrono::{DateTime, Duration, Utc};
use domain::services::lease_alerts::{bucket_lease_alerts, AlertWindows, LeaseAlerts};
use persistence::repositories::LeaseRepository;
use sqlx::PgPool;

use crate::config::JobsConfig;
use crate::services::OccupancyService;

#[derive(Clone)]
pub struct LeaseLifecycleService {
    leases: LeaseRepository,
    occupancy: OccupancyService,
    windows: AlertWindows,
}

impl LeaseLifecycleService {
    pub fn new(pool: PgPool, windows: AlertWindows) -> Self {
        Self {
            leases: LeaseRepository::new(pool.clone()),
            occupancy: OccupancyService::new(pool),
            windows,
        }
    }

    pub fn from_config(pool: PgPool, config: &JobsConfig) -> Self {
        Self::new(
            pool,
            AlertWindows {
                urgent_days: config.urgent_days,
                warning_days: config.warning_days,
            },
        )
    }

    /// Deactivates every active lease past its end date and recomputes the
    /// flat's occupancy for each.
    ///
    /// A lease that fails is logged and skipped. Returns how many leases were
    /// expired by this call; leases another writer already expired are not
    /// counted.
    pub async fn auto_expire_leases(&self, now: DateTime<Utc>) -> Result<usize, sqlx::Error> {
        let candidates = self.leases.find_expired_active(now).await?;
        let mut expired = 0;

        for lease in candidates {
            match self.leases.deactivate_if_expired(lease.id, now).await {
                Ok(true) => {
                    expired += 1;
                    if let Err(e) = self.occupancy.recompute_occupancy(lease.flat_id, now).await {
                        tracing::warn!(
                            lease_id = %lease.id,
                            flat_id = %lease.flat_id,
                            error = %e,
                            "Failed to recompute occupancy after lease expiry"
                        );
                    }
                    tracing::info!(lease_id = %lease.id, flat_id = %lease.flat_id, "Lease expired");
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(lease_id = %lease.id, error = %e, "Failed to expire lease");
                }
            }
        }

        Ok(expired)
    }

    /// Read-only snapshot of expiring and expired active leases.
    pub async fn compute_lease_alerts(&self, now: DateTime<Utc>) -> Result<LeaseAlerts, sqlx::Error> {
        let cutoff = now + Duration::days(self.windows.warning_days);
        let leases = self.leases.find_active_ending_by(cutoff).await?;
        Ok(bucket_lease_alerts(
            leases.into_iter().map(Into::into),
            now,
            self.windows,
        ))
    }
}
