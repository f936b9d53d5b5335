//! Occupancy and bill-assignment rules.
//!
//! Pure decisions over a flat's owner and its currently active leases:
//! - who is billed for a given bill type
//! - which occupancy label the flat carries
//!
//! The store-backed operations that load leases and persist the result live
//! in the API crate and delegate every decision to this module.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{BillType, Lease, OccupancyStatus};

/// Party responsible for a bill type on a leased flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillParty {
    Owner,
    Tenant,
}

/// Usage-driven charges follow the tenant; property charges stay with the owner.
pub fn responsible_party(bill_type: BillType) -> BillParty {
    match bill_type {
        BillType::Rent | BillType::Electricity | BillType::Water => BillParty::Tenant,
        BillType::Maintenance | BillType::Parking | BillType::Penalty => BillParty::Owner,
    }
}

/// Picks the payer for a bill.
///
/// Without a current tenant every bill goes to the owner.
pub fn assign_payer(owner_id: Uuid, current_tenant_id: Option<Uuid>, bill_type: BillType) -> Uuid {
    match (current_tenant_id, responsible_party(bill_type)) {
        (Some(tenant_id), BillParty::Tenant) => tenant_id,
        _ => owner_id,
    }
}

/// Occupancy label for a flat with `current_lease_count` currently active leases.
///
/// Never yields [`OccupancyStatus::Vacant`]; that value only exists on flats
/// that have not been recomputed since creation.
pub fn occupancy_for(current_lease_count: i64) -> OccupancyStatus {
    if current_lease_count > 0 {
        OccupancyStatus::TenantOccupied
    } else {
        OccupancyStatus::OwnerOccupied
    }
}

/// Selects the lease that governs billing among a flat's leases.
///
/// Only currently active leases qualify. If overlap prevention ever lets two
/// through, the most recently created wins, ties broken by the greater id.
pub fn select_current_lease(leases: &[Lease], now: DateTime<Utc>) -> Option<&Lease> {
    leases
        .iter()
        .filter(|lease| lease.is_currently_active(now))
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Occupancy derived directly from a flat's leases.
pub fn derive_occupancy(leases: &[Lease], now: DateTime<Utc>) -> OccupancyStatus {
    let count = leases
        .iter()
        .filter(|lease| lease.is_currently_active(now))
        .count();
    occupancy_for(count as i64)
}
