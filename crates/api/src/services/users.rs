//! Admin user and role rules.
//!
//! The `Super Admin` role must always have at least one holder, and the
//! role itself cannot be removed.

use domain::models::common::dedup_ids;
use domain::models::user::normalize_email;
use domain::models::{
    CreateUserRequest, Role, UpdateUserRequest, User, UserResponse, SUPER_ADMIN_ROLE,
};
use persistence::repositories::{RoleRepository, UserInput, UserRepository};
use shared::password::hash_password;
use sqlx::PgPool;

use crate::error::ApiError;

pub struct UserService {
    users: UserRepository,
    roles: RoleRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse, ApiError> {
        let user: User = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))?
            .into();
        self.with_roles(user).await
    }

    pub async fn create(&self, input: &CreateUserRequest) -> Result<UserResponse, ApiError> {
        let email = normalize_email(&input.email);
        self.ensure_email_free(&email, None).await?;
        let role_ids = self.resolve_roles(&input.role_ids).await?;
        let password_hash = hash(&input.password)?;

        let user: User = self
            .users
            .create(&UserInput {
                name: input.name.trim(),
                email: &email,
                password_hash: Some(&password_hash),
                role_ids: &role_ids,
            })
            .await?
            .into();

        tracing::info!(user_id = user.id, email = %user.email, "Admin user created");
        self.with_roles(user).await
    }

    pub async fn update(&self, id: i64, input: &UpdateUserRequest) -> Result<UserResponse, ApiError> {
        let current = self.get(id).await?;
        let role_ids = self.resolve_roles(&input.role_ids).await?;

        if current.is_super_admin() && !self.grants_super_admin(&role_ids).await? {
            self.ensure_other_super_admin(&[id]).await?;
        }

        let email = normalize_email(&input.email);
        self.ensure_email_free(&email, Some(id)).await?;
        let password_hash = input.password.as_deref().map(hash).transpose()?;

        let user: User = self
            .users
            .update(
                id,
                &UserInput {
                    name: input.name.trim(),
                    email: &email,
                    password_hash: password_hash.as_deref(),
                    role_ids: &role_ids,
                },
            )
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))?
            .into();

        tracing::info!(user_id = id, "Admin user updated");
        self.with_roles(user).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(ApiError::not_found("User", id));
        }
        if !self.users.super_admin_ids(&[id]).await?.is_empty() {
            self.ensure_other_super_admin(&[id]).await?;
        }

        self.users.delete(id).await?;
        tracing::info!(user_id = id, "Admin user deleted");
        Ok(())
    }

    /// Deletes many users; refused as a whole when it would remove every
    /// Super Admin.
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, ApiError> {
        let ids = dedup_ids(ids);
        if !self.users.super_admin_ids(&ids).await?.is_empty() {
            self.ensure_other_super_admin(&ids).await?;
        }

        let deleted = self.users.bulk_delete(&ids).await?;
        tracing::info!(count = deleted, "Admin users bulk deleted");
        Ok(deleted)
    }

    pub async fn with_roles(&self, user: User) -> Result<UserResponse, ApiError> {
        let mut roles = self.users.roles_for_users(&[user.id]).await?;
        Ok(UserResponse {
            roles: roles.remove(&user.id).unwrap_or_default(),
            user,
        })
    }

    /// Validates that every requested role exists.
    async fn resolve_roles(&self, role_ids: &[i64]) -> Result<Vec<i64>, ApiError> {
        let requested = dedup_ids(role_ids);
        if requested.is_empty() {
            return Ok(requested);
        }
        let found = self.roles.find_by_ids(&requested).await?;
        if found.len() != requested.len() {
            let missing: Vec<String> = requested
                .iter()
                .filter(|id| !found.iter().any(|r| r.id == **id))
                .map(|id| id.to_string())
                .collect();
            return Err(ApiError::validation(format!(
                "Unknown role ids: {}",
                missing.join(", ")
            )));
        }
        Ok(requested)
    }

    async fn grants_super_admin(&self, role_ids: &[i64]) -> Result<bool, ApiError> {
        if role_ids.is_empty() {
            return Ok(false);
        }
        let roles = self.roles.find_by_ids(role_ids).await?;
        Ok(roles.into_iter().map(Role::from).any(|r| r.is_super_admin()))
    }

    async fn ensure_email_free(&self, email: &str, owner_id: Option<i64>) -> Result<(), ApiError> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner_id => {
                Err(ApiError::Conflict(format!("Email {} is already in use", email)))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_other_super_admin(&self, excluded: &[i64]) -> Result<(), ApiError> {
        if self.users.count_super_admins_excluding(excluded).await? == 0 {
            return Err(ApiError::DomainRule(format!(
                "At least one user must keep the {} role",
                SUPER_ADMIN_ROLE
            )));
        }
        Ok(())
    }
}

/// Refuses to delete the `Super Admin` role.
pub fn ensure_role_deletable(role: &Role) -> Result<(), ApiError> {
    if role.is_super_admin() {
        return Err(ApiError::DomainRule(format!(
            "The {} role cannot be deleted",
            SUPER_ADMIN_ROLE
        )));
    }
    Ok(())
}

/// Refuses to rename the `Super Admin` role, which the rules above key on.
pub fn ensure_role_renamable(role: &Role, new_name: &str) -> Result<(), ApiError> {
    if role.is_super_admin() && new_name.trim() != SUPER_ADMIN_ROLE {
        return Err(ApiError::DomainRule(format!(
            "The {} role cannot be renamed",
            SUPER_ADMIN_ROLE
        )));
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, ApiError> {
    hash_password(password).map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn role(name: &str) -> Role {
        let now = Utc::now();
        Role {
            id: 1,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_super_admin_role_protected() {
        assert!(matches!(
            ensure_role_deletable(&role(SUPER_ADMIN_ROLE)),
            Err(ApiError::DomainRule(_))
        ));
        assert!(ensure_role_deletable(&role("Editor")).is_ok());
    }

    #[test]
    fn test_super_admin_role_rename() {
        assert!(ensure_role_renamable(&role(SUPER_ADMIN_ROLE), "Owner").is_err());
        assert!(ensure_role_renamable(&role(SUPER_ADMIN_ROLE), SUPER_ADMIN_ROLE).is_ok());
        assert!(ensure_role_renamable(&role("Editor"), "Content editor").is_ok());
    }
}
