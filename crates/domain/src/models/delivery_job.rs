//! Queued delivery work.
//!
//! Jobs are stored with a serialized JSON payload. The payload text is what
//! job invalidation scans, so its shape is part of the storage format:
//! `{"job":"send_advertisement","advertisement_id":7}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue that advertisement deliveries are dispatched to.
pub const DELIVERY_QUEUE: &str = "advertisements";

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryJob {
    pub id: i64,
    pub queue: String,
    pub payload: String,
    pub attempts: i32,
    pub available_at: DateTime<Utc>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DeliveryJob {
    pub fn decode(&self) -> Result<JobPayload, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

/// Work a queued job describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum JobPayload {
    SendAdvertisement { advertisement_id: i64 },
}

impl JobPayload {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let payload = JobPayload::SendAdvertisement { advertisement_id: 7 };
        assert_eq!(
            payload.encode().unwrap(),
            r#"{"job":"send_advertisement","advertisement_id":7}"#
        );
    }

    #[test]
    fn test_decode_job() {
        let now = Utc::now();
        let job = DeliveryJob {
            id: 1,
            queue: DELIVERY_QUEUE.to_string(),
            payload: r#"{"job":"send_advertisement","advertisement_id":12}"#.to_string(),
            attempts: 0,
            available_at: now,
            reserved_at: None,
            created_at: now,
        };
        assert_eq!(
            job.decode().unwrap(),
            JobPayload::SendAdvertisement { advertisement_id: 12 }
        );

        let broken = DeliveryJob {
            payload: "{not json".to_string(),
            ..job
        };
        assert!(broken.decode().is_err());
    }
}
