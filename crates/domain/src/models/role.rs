//! User roles and their privilege hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by every user account.
///
/// Roles form a total order used for "at least as privileged as" checks:
/// GUARD < STAFF < TENANT < OWNER < SECRETARY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Secretary,
    Owner,
    Tenant,
    Staff,
    Guard,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Secretary,
        Role::Owner,
        Role::Tenant,
        Role::Staff,
        Role::Guard,
    ];

    /// Position in the role hierarchy. Higher value = more privileges.
    pub fn level(&self) -> u8 {
        match self {
            Role::Guard => 1,
            Role::Staff => 2,
            Role::Tenant => 3,
            Role::Owner => 4,
            Role::Secretary => 5,
        }
    }

    /// Check if this role is at least as privileged as `required`.
    pub fn has_at_least(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Owners and tenants live in the building and see their own flats.
    pub fn is_resident(&self) -> bool {
        matches!(self, Role::Owner | Role::Tenant)
    }

    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Secretary => "SECRETARY",
            Role::Owner => "OWNER",
            Role::Tenant => "TENANT",
            Role::Staff => "STAFF",
            Role::Guard => "GUARD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SECRETARY" => Ok(Role::Secretary),
            "OWNER" => Ok(Role::Owner),
            "TENANT" => Ok(Role::Tenant),
            "STAFF" => Ok(Role::Staff),
            "GUARD" => Ok(Role::Guard),
            _ => Err(format!(
                "Invalid role: {}. Must be one of: SECRETARY, OWNER, TENANT, STAFF, GUARD",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_strictly_ordered() {
        let ordered = [
            Role::Guard,
            Role::Staff,
            Role::Tenant,
            Role::Owner,
            Role::Secretary,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].level() < pair[1].level());
        }
        assert_eq!(Role::Guard.level(), 1);
        assert_eq!(Role::Secretary.level(), 5);
    }

    #[test]
    fn test_higher_role_passes_lower_minimum() {
        for a in Role::ALL {
            for b in Role::ALL {
                if a.level() < b.level() {
                    assert!(b.has_at_least(a), "{} should satisfy min {}", b, a);
                    assert!(!a.has_at_least(b), "{} should not satisfy min {}", a, b);
                }
            }
            assert!(a.has_at_least(a));
        }
    }

    #[test]
    fn test_role_string_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Secretary).unwrap(), "\"SECRETARY\"");
        let parsed: Role = serde_json::from_str("\"GUARD\"").unwrap();
        assert_eq!(parsed, Role::Guard);
    }

    #[test]
    fn test_is_resident() {
        assert!(Role::Owner.is_resident());
        assert!(Role::Tenant.is_resident());
        assert!(!Role::Secretary.is_resident());
        assert!(!Role::Staff.is_resident());
        assert!(!Role::Guard.is_resident());
    }
}
