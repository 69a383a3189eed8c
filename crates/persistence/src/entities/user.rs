//! Admin user and role entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Role, RoleWithUsage, User};

/// Row of the users table, including the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleEntity {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleEntity> for Role {
    fn from(entity: RoleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Role joined with a user-count aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct RoleUsageEntity {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub users_count: i64,
}

impl From<RoleUsageEntity> for RoleWithUsage {
    fn from(entity: RoleUsageEntity) -> Self {
        Self {
            role: Role {
                id: entity.id,
                name: entity.name,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            users_count: entity.users_count,
        }
    }
}

/// A role assignment row, used to attach roles to a page of users.
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleEntity {
    pub user_id: i64,
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRoleEntity {
    pub fn into_role(self) -> (i64, Role) {
        (
            self.user_id,
            Role {
                id: self.id,
                name: self.name,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        )
    }
}
