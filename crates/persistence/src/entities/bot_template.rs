//! Bot template entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use domain::models::BotTemplate;

#[derive(Debug, Clone, FromRow)]
pub struct BotTemplateEntity {
    pub id: i64,
    pub template_type: String,
    pub name: String,
    pub content: String,
    pub variables: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BotTemplateEntity> for BotTemplate {
    fn from(entity: BotTemplateEntity) -> Self {
        Self {
            id: entity.id,
            template_type: entity.template_type,
            name: entity.name,
            content: entity.content,
            variables: entity.variables.0,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
