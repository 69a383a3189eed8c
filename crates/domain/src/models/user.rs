//! Admin panel users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

use super::role::{Role, SUPER_ADMIN_ROLE};

/// An admin account. The password hash never leaves the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned by the API, with assigned roles.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<Role>,
}

impl UserResponse {
    pub fn is_super_admin(&self) -> bool {
        self.roles.iter().any(|r| r.name == SUPER_ADMIN_ROLE)
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// Body of `PUT /users/:id`. A missing password keeps the current one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub role_id: Option<i64>,
    pub order: Option<SortOrder>,
}

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
