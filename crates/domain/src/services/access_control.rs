//! Role-based access control.
//!
//! Permissions are strings of the form `resource:action` or
//! `resource:action:own`. The `:own` suffix limits the action to resources
//! the caller owns, authored, reported or resides in.
//!
//! The permission table is built once and never mutated. Every function in
//! this module is a pure decision; the HTTP layer turns a `false` into 403.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::Role;

const SECRETARY_PERMISSIONS: &[&str] = &[
    "users:create", "users:read", "users:update", "users:delete",
    "flats:create", "flats:read", "flats:update", "flats:delete",
    "leases:create", "leases:read", "leases:update", "leases:delete",
    "bills:create", "bills:read", "bills:update", "bills:delete",
    "notices:create", "notices:read", "notices:update", "notices:delete",
    "issues:create", "issues:read", "issues:update", "issues:delete",
    "visitors:create", "visitors:read", "visitors:update", "visitors:delete",
    "bills:pay",
    "visitors:approve",
    "dashboard:read",
];

const RESIDENT_PERMISSIONS: &[&str] = &[
    "users:read:own",
    "flats:read:own",
    "leases:read:own",
    "bills:read:own",
    "bills:pay:own",
    "notices:read",
    "issues:create",
    "issues:read:own",
    "issues:update:own",
    "visitors:read:own",
    "visitors:approve:own",
    "dashboard:read",
];

const OWNER_EXTRA_PERMISSIONS: &[&str] = &["leases:create:own", "leases:update:own"];

const STAFF_PERMISSIONS: &[&str] = &[
    "flats:read",
    "notices:read",
    "issues:read",
    "issues:update",
    "visitors:read",
    "dashboard:read",
];

const GUARD_PERMISSIONS: &[&str] = &[
    "flats:read",
    "notices:read",
    "visitors:create",
    "visitors:read",
    "visitors:update",
    "dashboard:read",
];

lazy_static! {
    static ref PERMISSIONS: HashMap<Role, HashSet<&'static str>> = {
        let mut table = HashMap::new();
        table.insert(Role::Secretary, SECRETARY_PERMISSIONS.iter().copied().collect());
        table.insert(
            Role::Owner,
            RESIDENT_PERMISSIONS
                .iter()
                .chain(OWNER_EXTRA_PERMISSIONS)
                .copied()
                .collect(),
        );
        table.insert(Role::Tenant, RESIDENT_PERMISSIONS.iter().copied().collect());
        table.insert(Role::Staff, STAFF_PERMISSIONS.iter().copied().collect());
        table.insert(Role::Guard, GUARD_PERMISSIONS.iter().copied().collect());
        table
    };
}

/// How far a caller's access to a resource action reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every record.
    All,
    /// Only records tied to the caller.
    Own,
    Denied,
}

/// Full permission set of a role.
pub fn permissions_for(role: Role) -> Option<&'static HashSet<&'static str>> {
    PERMISSIONS.get(&role)
}

pub fn has_permission(role: Role, permission: &str) -> bool {
    permissions_for(role).is_some_and(|perms| perms.contains(permission))
}

pub fn has_min_role(role: Role, min: Role) -> bool {
    role.has_at_least(min)
}

pub fn has_any_role(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// SECRETARY always owns; everyone else only their own records.
pub fn owns_resource(role: Role, caller_id: Uuid, owner_id: Uuid) -> bool {
    role == Role::Secretary || caller_id == owner_id
}

/// Resolves `resource:action` against the table, falling back to the `:own` variant.
pub fn scope_for(role: Role, resource: &str, action: &str) -> Scope {
    let permission = format!("{}:{}", resource, action);
    if has_permission(role, &permission) {
        Scope::All
    } else if has_permission(role, &format!("{}:own", permission)) {
        Scope::Own
    } else {
        Scope::Denied
    }
}
