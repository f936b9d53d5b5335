//! Domain layer for the apartment manager.
//!
//! This crate contains:
//! - Domain models (User, Flat, Lease, Bill, Notice, Issue, VisitorLog)
//! - Request DTOs with validation rules
//! - Pure policy services: occupancy and bill assignment, lease alerts, access control

pub mod models;
pub mod services;
