//! Bot menu buttons.
//!
//! Buttons form a tree through `parent_id`. Root buttons make up the main
//! menu; a `submenu` button opens its children, a `content` button shows its
//! text and media, a `url` button links out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuButtonType {
    Submenu,
    Content,
    Url,
}

impl MenuButtonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuButtonType::Submenu => "submenu",
            MenuButtonType::Content => "content",
            MenuButtonType::Url => "url",
        }
    }
}

impl std::str::FromStr for MenuButtonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submenu" => Ok(MenuButtonType::Submenu),
            "content" => Ok(MenuButtonType::Content),
            "url" => Ok(MenuButtonType::Url),
            other => Err(format!("Unknown menu button type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuButton {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub label: String,
    pub button_type: MenuButtonType,
    pub content: Option<String>,
    pub url: Option<String>,
    pub media_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /menu-buttons` and `PUT /menu-buttons/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_menu_button_request"))]
pub struct MenuButtonRequest {
    pub parent_id: Option<i64>,

    #[validate(
        length(min = 1, max = 64, message = "Label must be 1-64 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub label: String,

    pub button_type: MenuButtonType,

    #[validate(length(max = 4096, message = "Content must be at most 4096 characters"))]
    pub content: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub url: Option<String>,

    pub media_id: Option<i64>,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn validate_menu_button_request(request: &MenuButtonRequest) -> Result<(), ValidationError> {
    match request.button_type {
        MenuButtonType::Url if request.url.is_none() => {
            let mut err = ValidationError::new("url_required");
            err.message = Some("url is required for url buttons".into());
            Err(err)
        }
        MenuButtonType::Content
            if request.content.as_deref().map_or(true, |c| c.trim().is_empty())
                && request.media_id.is_none() =>
        {
            let mut err = ValidationError::new("content_required");
            err.message = Some("content or media_id is required for content buttons".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Query string of `GET /menu-buttons`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuButtonQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    /// Restrict to children of this button.
    pub parent_id: Option<i64>,
    /// Restrict to root buttons.
    pub root_only: Option<bool>,
    pub order: Option<SortOrder>,
}

/// A button with its descendants, as returned by `GET /menu-buttons/tree`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuTreeNode {
    #[serde(flatten)]
    pub button: MenuButton,
    pub children: Vec<MenuTreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_type_parse() {
        assert_eq!("submenu".parse::<MenuButtonType>(), Ok(MenuButtonType::Submenu));
        assert_eq!(MenuButtonType::Url.as_str(), "url");
        assert!("link".parse::<MenuButtonType>().is_err());
    }

    #[test]
    fn test_url_button_requires_url() {
        let request: MenuButtonRequest =
            serde_json::from_str(r#"{"label":"Site","button_type":"url"}"#).unwrap();
        assert!(request.validate().is_err());

        let request: MenuButtonRequest = serde_json::from_str(
            r#"{"label":"Site","button_type":"url","url":"https://example.com"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_content_button_requires_body() {
        let request: MenuButtonRequest =
            serde_json::from_str(r#"{"label":"About","button_type":"content","content":" "}"#)
                .unwrap();
        assert!(request.validate().is_err());

        let request: MenuButtonRequest =
            serde_json::from_str(r#"{"label":"About","button_type":"content","media_id":3}"#)
                .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submenu_defaults() {
        let request: MenuButtonRequest =
            serde_json::from_str(r#"{"label":"Catalog","button_type":"submenu"}"#).unwrap();
        assert!(request.is_active);
        assert_eq!(request.sort_order, 0);
        assert!(request.validate().is_ok());
    }
}
