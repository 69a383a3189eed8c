//! Admin roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Name of the role that may never be left without a holder.
pub const SUPER_ADMIN_ROLE: &str = "Super Admin";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        self.name == SUPER_ADMIN_ROLE
    }
}

/// Role with the number of users holding it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleWithUsage {
    #[serde(flatten)]
    pub role: Role,
    pub users_count: i64,
}

/// Body of `POST /roles` and `PUT /roles/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,
}

/// Query string of `GET /roles`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoleQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_super_admin() {
        let now = Utc::now();
        let role = Role {
            id: 1,
            name: SUPER_ADMIN_ROLE.to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(role.is_super_admin());

        let editor = Role {
            name: "Editor".to_string(),
            ..role
        };
        assert!(!editor.is_super_admin());
    }

    #[test]
    fn test_role_with_usage_flattens() {
        let now = Utc::now();
        let usage = RoleWithUsage {
            role: Role {
                id: 2,
                name: "Editor".to_string(),
                created_at: now,
                updated_at: now,
            },
            users_count: 3,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["name"], "Editor");
        assert_eq!(json["users_count"], 3);
    }
}
