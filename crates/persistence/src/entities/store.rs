//! Store entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Store;

#[derive(Debug, Clone, FromRow)]
pub struct StoreEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_media_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoreEntity> for Store {
    fn from(entity: StoreEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            address: entity.address,
            phone: entity.phone,
            logo_media_id: entity.logo_media_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
