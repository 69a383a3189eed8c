//! Pinned messages sent (and pinned) when a user starts the bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PinMessage {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub media_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /pin-messages` and `PUT /pin-messages/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PinMessageRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(
        length(min = 1, max = 4096, message = "Content must be 1-4096 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub content: String,

    pub media_id: Option<i64>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Query string of `GET /pin-messages`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PinMessageQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_message_request() {
        let request: PinMessageRequest =
            serde_json::from_str(r#"{"title":"Rules","content":"Be nice."}"#).unwrap();
        assert!(request.is_active);
        assert!(request.validate().is_ok());

        let request: PinMessageRequest =
            serde_json::from_str(r#"{"title":"Rules","content":""}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
