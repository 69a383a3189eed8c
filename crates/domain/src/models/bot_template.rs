//! Bot message templates.
//!
//! A template is a message body with `{placeholder}` variables. Templates are
//! grouped by `template_type`; at most one template per type is active and
//! that one is what the bot sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

/// Template types the bot looks up by name.
pub mod types {
    pub const WELCOME: &str = "welcome";
    pub const HELP: &str = "help";
    pub const UNKNOWN_COMMAND: &str = "unknown_command";
    pub const FALLBACK: &str = "fallback";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotTemplate {
    pub id: i64,
    pub template_type: String,
    pub name: String,
    pub content: String,
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /bot-templates` and `PUT /bot-templates/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BotTemplateRequest {
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub template_type: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Telegram caps message text at 4096 characters.
    #[validate(
        length(min = 1, max = 4096, message = "Content must be 1-4096 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub content: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "At most 32 variables are allowed"))]
    pub variables: Vec<String>,

    #[serde(default)]
    pub is_active: bool,
}

/// Query string of `GET /bot-templates`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BotTemplateQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub template_type: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_inactive() {
        let request: BotTemplateRequest = serde_json::from_str(
            r#"{"template_type":"welcome","name":"Default welcome","content":"Hi {first_name}!"}"#,
        )
        .unwrap();
        assert!(!request.is_active);
        assert!(request.variables.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_bad_type() {
        let request: BotTemplateRequest = serde_json::from_str(
            r#"{"template_type":"Welcome Message","name":"x","content":"Hi"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_oversized_content() {
        let request = BotTemplateRequest {
            template_type: types::HELP.to_string(),
            name: "Help".to_string(),
            content: "x".repeat(4097),
            variables: vec![],
            is_active: true,
        };
        assert!(request.validate().is_err());
    }
}
