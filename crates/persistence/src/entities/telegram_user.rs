//! Telegram user entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::TelegramUser;

#[derive(Debug, Clone, FromRow)]
pub struct TelegramUserEntity {
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

impl From<TelegramUserEntity> for TelegramUser {
    fn from(entity: TelegramUserEntity) -> Self {
        Self {
            id: entity.id,
            telegram_id: entity.telegram_id,
            chat_id: entity.chat_id,
            username: entity.username,
            first_name: entity.first_name,
            last_name: entity.last_name,
            language_code: entity.language_code,
            is_blocked: entity.is_blocked,
            started_at: entity.started_at,
            last_seen_at: entity.last_seen_at,
            created_at: entity.created_at,
        }
    }
}
