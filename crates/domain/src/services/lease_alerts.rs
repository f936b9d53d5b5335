//! Expiring-lease alert buckets for dashboards.
//!
//! Over leases still flagged `is_active`:
//! - urgent: end date within the next `urgent_days` (inclusive)
//! - warning: end date after the urgent window, within `warning_days`
//! - expired: end date already past, so the expiry job has not caught up yet

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::dashboard::LeaseAlertCounts;
use crate::models::Lease;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Window sizes for the alert buckets, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertWindows {
    pub urgent_days: i64,
    pub warning_days: i64,
}

impl Default for AlertWindows {
    fn default() -> Self {
        Self {
            urgent_days: 7,
            warning_days: 30,
        }
    }
}

/// A lease annotated with its distance to the end date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseAlert {
    #[serde(flatten)]
    pub lease: Lease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaseAlerts {
    pub urgent: Vec<LeaseAlert>,
    pub warning: Vec<LeaseAlert>,
    pub expired: Vec<LeaseAlert>,
}

impl LeaseAlerts {
    pub fn counts(&self) -> LeaseAlertCounts {
        LeaseAlertCounts {
            urgent: self.urgent.len(),
            warning: self.warning.len(),
            expired: self.expired.len(),
        }
    }
}

/// Whole days from `from` to `to`, rounded up. Zero or negative spans give 0.
pub fn days_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}

/// Sorts active leases into alert buckets. Read-only.
///
/// Each bucket is ordered by end date, earliest first.
pub fn bucket_lease_alerts(
    leases: impl IntoIterator<Item = Lease>,
    now: DateTime<Utc>,
    windows: AlertWindows,
) -> LeaseAlerts {
    let urgent_cutoff = now + chrono::Duration::days(windows.urgent_days);
    let warning_cutoff = now + chrono::Duration::days(windows.warning_days);

    let mut alerts = LeaseAlerts::default();

    for lease in leases.into_iter().filter(|l| l.is_active) {
        let end = lease.end_date;
        if end < now {
            alerts.expired.push(LeaseAlert {
                days_overdue: Some(days_ceil(end, now)),
                days_until_expiry: None,
                lease,
            });
        } else if end <= urgent_cutoff {
            alerts.urgent.push(LeaseAlert {
                days_until_expiry: Some(days_ceil(now, end)),
                days_overdue: None,
                lease,
            });
        } else if end <= warning_cutoff {
            alerts.warning.push(LeaseAlert {
                days_until_expiry: Some(days_ceil(now, end)),
                days_overdue: None,
                lease,
            });
        }
    }

    for bucket in [&mut alerts.urgent, &mut alerts.warning, &mut alerts.expired] {
        bucket.sort_by_key(|alert| alert.lease.end_date);
    }

    alerts
}
