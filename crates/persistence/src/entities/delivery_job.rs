//! Delivery job entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::DeliveryJob;

#[derive(Debug, Clone, FromRow)]
pub struct DeliveryJobEntity {
    pub id: i64,
    pub queue: String,
    pub payload: String,
    pub attempts: i32,
    pub available_at: DateTime<Utc>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryJobEntity> for DeliveryJob {
    fn from(entity: DeliveryJobEntity) -> Self {
        Self {
            id: entity.id,
            queue: entity.queue,
            payload: entity.payload,
            attempts: entity.attempts,
            available_at: entity.available_at,
            reserved_at: entity.reserved_at,
            created_at: entity.created_at,
        }
    }
}

/// Candidate row for payload scanning.
#[derive(Debug, Clone, FromRow)]
pub struct JobPayloadRow {
    pub id: i64,
    pub payload: String,
}
