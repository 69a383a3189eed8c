//! People who talk to the bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelegramUser {
    pub id: i64,
    pub telegram_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_blocked: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub last_seen_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TelegramUser {
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone().unwrap_or_default(),
        }
    }
}

/// Profile fields captured from an inbound update.
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramUserProfile {
    pub telegram_id: i64,
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

/// Body of `PUT /telegram-users/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTelegramUserRequest {
    pub is_blocked: bool,
}

/// Query string of `GET /telegram-users`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TelegramUserQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_blocked: Option<bool>,
    pub order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, username: Option<&str>) -> TelegramUser {
        let now = Utc::now();
        TelegramUser {
            id: 1,
            telegram_id: 42,
            chat_id: 42,
            username: username.map(str::to_string),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            language_code: None,
            is_blocked: false,
            started_at: None,
            last_seen_at: now,
            created_at: now,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(user(Some("Ada"), Some("Lovelace"), None).full_name(), "Ada Lovelace");
        assert_eq!(user(Some("Ada"), None, None).full_name(), "Ada");
        assert_eq!(user(None, None, Some("ada_l")).full_name(), "ada_l");
        assert_eq!(user(None, None, None).full_name(), "");
    }
}
