//! Store-backed occupancy and bill-assignment operations.
//!
//! Loads a flat's leases and hands every decision to
//! `domain::services::occupancy`.

use chrono::{DateTime, Utc};
use domain::models::{BillType, Lease, OccupancyStatus, User};
use domain::services::occupancy::{self, derive_occupancy, select_current_lease};
use persistence::repositories::{FlatRepository, LeaseRepository, UserRepository};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Flat not found")]
    FlatNotFound,

    #[error("Payer {0} not found")]
    PayerNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::FlatNotFound => ApiError::NotFound("Flat not found".into()),
            PolicyError::PayerNotFound(id) => {
                ApiError::Internal(format!("Payer {} for flat does not exist", id))
            }
            PolicyError::Database(e) => e.into(),
        }
    }
}

#[derive(Clone)]
pub struct OccupancyService {
    flats: FlatRepository,
    leases: LeaseRepository,
    users: UserRepository,
}

impl OccupancyService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            flats: FlatRepository::new(pool.clone()),
            leases: LeaseRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    async fn active_leases(&self, flat_id: Uuid) -> Result<Vec<Lease>, sqlx::Error> {
        Ok(self
            .leases
            .find_active_for_flat(flat_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Who pays a bill of `bill_type` on the flat right now.
    pub async fn assign_payer(
        &self,
        flat_id: Uuid,
        bill_type: BillType,
        now: DateTime<Utc>,
    ) -> Result<User, PolicyError> {
        let flat = self
            .flats
            .find_by_id(flat_id)
            .await?
            .ok_or(PolicyError::FlatNotFound)?;

        let leases = self.active_leases(flat_id).await?;
        let tenant_id = select_current_lease(&leases, now).map(|lease| lease.tenant_id);
        let payer_id = occupancy::assign_payer(flat.owner_id, tenant_id, bill_type);

        tracing::debug!(
            flat_id = %flat_id,
            bill_type = %bill_type,
            payer_id = %payer_id,
            leased = tenant_id.is_some(),
            "Bill payer assigned"
        );

        self.users
            .find_by_id(payer_id)
            .await?
            .map(Into::into)
            .ok_or(PolicyError::PayerNotFound(payer_id))
    }

    /// Re-derives the flat's occupancy from its current leases and persists it.
    pub async fn recompute_occupancy(
        &self,
        flat_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<OccupancyStatus, PolicyError> {
        let leases = self.active_leases(flat_id).await?;
        let status = derive_occupancy(&leases, now);

        self.flats
            .set_occupancy(flat_id, status.as_str())
            .await?
            .ok_or(PolicyError::FlatNotFound)?;

        tracing::debug!(flat_id = %flat_id, occupancy = %status, "Occupancy recomputed");
        Ok(status)
    }
}
