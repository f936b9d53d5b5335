//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Role, User};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            // Unknown values fall back to the least privileged role
            role: entity.role.parse().unwrap_or(Role::Guard),
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(role: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            email: "tenant@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            first_name: "Meera".to_string(),
            last_name: "Iyer".to_string(),
            phone: Some("9876543210".to_string()),
            role: role.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let user: User = entity("TENANT").into();
        assert_eq!(user.role, Role::Tenant);
        assert_eq!(user.first_name, "Meera");
    }

    #[test]
    fn test_unknown_role_is_least_privileged() {
        let user: User = entity("ADMIN").into();
        assert_eq!(user.role, Role::Guard);
    }
}
