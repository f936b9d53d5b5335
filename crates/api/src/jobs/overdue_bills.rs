//! Background job that marks unpaid bills past their due date as overdue.

use chrono::Utc;
use persistence::repositories::BillRepository;
use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_bills_marked_overdue;

pub struct OverdueBillsJob {
    bills: BillRepository,
    frequency: JobFrequency,
}

impl OverdueBillsJob {
    pub fn new(pool: PgPool, frequency: JobFrequency) -> Self {
        Self {
            bills: BillRepository::new(pool),
            frequency,
        }
    }
}

#[async_trait::async_trait]
impl Job for OverdueBillsJob {
    fn name(&self) -> &'static str {
        "overdue_bills"
    }

    fn frequency(&self) -> JobFrequency {
        self.frequency
    }

    async fn execute(&self) -> Result<(), String> {
        let updated = self
            .bills
            .mark_overdue(Utc::now())
            .await
            .map_err(|e| format!("Failed to mark overdue bills: {}", e))?;

        record_bills_marked_overdue(updated);
        if updated > 0 {
            tracing::info!(job = self.name(), updated, "Bills marked overdue");
        }
        Ok(())
    }
}
