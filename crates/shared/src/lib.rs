//! Shared utilities used by every crate of the apartment manager backend.
//!
//! - JWT access token issuance and verification
//! - Password hashing with Argon2id
//! - Page/limit pagination helpers
//! - Field validators used by request DTOs

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
