//! Pin message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::PinMessage;

#[derive(Debug, Clone, FromRow)]
pub struct PinMessageEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub media_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PinMessageEntity> for PinMessage {
    fn from(entity: PinMessageEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            media_id: entity.media_id,
            sort_order: entity.sort_order,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
