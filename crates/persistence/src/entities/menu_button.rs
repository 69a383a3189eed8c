//! Menu button entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{MenuButton, MenuButtonType};

#[derive(Debug, Clone, FromRow)]
pub struct MenuButtonEntity {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub label: String,
    pub button_type: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub media_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuButtonEntity> for MenuButton {
    fn from(entity: MenuButtonEntity) -> Self {
        Self {
            id: entity.id,
            parent_id: entity.parent_id,
            label: entity.label,
            button_type: entity
                .button_type
                .parse()
                .unwrap_or(MenuButtonType::Content),
            content: entity.content,
            url: entity.url,
            media_id: entity.media_id,
            sort_order: entity.sort_order,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
