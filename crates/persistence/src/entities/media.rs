//! Media library entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::MediaItem;

#[derive(Debug, Clone, FromRow)]
pub struct MediaEntity {
    pub id: i64,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

impl From<MediaEntity> for MediaItem {
    fn from(entity: MediaEntity) -> Self {
        Self {
            id: entity.id,
            file_name: entity.file_name,
            original_name: entity.original_name,
            mime_type: entity.mime_type,
            size_bytes: entity.size_bytes,
            // CHAR(64) pads; checksums are always 64 hex chars anyway.
            checksum: entity.checksum.trim_end().to_string(),
            path: entity.path,
            created_at: entity.created_at,
        }
    }
}
