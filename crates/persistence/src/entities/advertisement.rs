//! Advertisement entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Advertisement, AdvertisementSend, AdvertisementStatus};

/// Row of the advertisements table. Soft-deleted rows are never loaded.
#[derive(Debug, Clone, FromRow)]
pub struct AdvertisementEntity {
    pub id: i64,
    pub store_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub media_id: Option<i64>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: String,
    pub frequency_cap_minutes: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdvertisementEntity> for Advertisement {
    fn from(entity: AdvertisementEntity) -> Self {
        Self {
            id: entity.id,
            store_id: entity.store_id,
            title: entity.title,
            description: entity.description,
            media_id: entity.media_id,
            button_text: entity.button_text,
            button_url: entity.button_url,
            start_date: entity.start_date,
            end_date: entity.end_date,
            // The column is constrained to known values.
            status: entity
                .status
                .parse()
                .unwrap_or(AdvertisementStatus::Inactive),
            frequency_cap_minutes: entity.frequency_cap_minutes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AdvertisementSendEntity {
    pub id: i64,
    pub advertisement_id: i64,
    pub telegram_user_id: i64,
    pub sent_at: DateTime<Utc>,
}

impl From<AdvertisementSendEntity> for AdvertisementSend {
    fn from(entity: AdvertisementSendEntity) -> Self {
        Self {
            id: entity.id,
            advertisement_id: entity.advertisement_id,
            telegram_user_id: entity.telegram_user_id,
            sent_at: entity.sent_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str) -> AdvertisementEntity {
        let now = Utc::now();
        AdvertisementEntity {
            id: 7,
            store_id: Some(2),
            title: "Weekend sale".to_string(),
            description: None,
            media_id: None,
            button_text: None,
            button_url: None,
            start_date: None,
            end_date: None,
            status: status.to_string(),
            frequency_cap_minutes: 30,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_entity_to_model() {
        let ad: Advertisement = entity("active").into();
        assert_eq!(ad.id, 7);
        assert_eq!(ad.status, AdvertisementStatus::Active);
        assert_eq!(ad.frequency_cap_minutes, 30);
    }

    #[test]
    fn test_unknown_status_is_not_deliverable() {
        let ad: Advertisement = entity("archived").into();
        assert_eq!(ad.status, AdvertisementStatus::Inactive);
    }
}
