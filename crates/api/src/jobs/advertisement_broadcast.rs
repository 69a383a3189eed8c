//! Re-queues deliveries for advertisements that are ready to send.
//!
//! Catches advertisements whose window opened without a queued job, and
//! repeats delivery once frequency caps have elapsed.

use chrono::Utc;
use domain::models::Advertisement;
use persistence::repositories::AdvertisementRepository;
use sqlx::PgPool;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::services::DeliveryQueue;

pub struct AdvertisementBroadcastJob {
    ads: AdvertisementRepository,
    queue: DeliveryQueue,
    interval_minutes: u64,
}

impl AdvertisementBroadcastJob {
    pub fn new(pool: PgPool, interval_minutes: u64) -> Self {
        Self {
            ads: AdvertisementRepository::new(pool.clone()),
            queue: DeliveryQueue::new(pool),
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for AdvertisementBroadcastJob {
    fn name(&self) -> &'static str {
        "advertisement_broadcast"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let now = Utc::now();
        let ready: Vec<Advertisement> = self
            .ads
            .ready_to_send(now)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let mut queued = 0;
        for ad in &ready {
            if !self.queue.find_jobs_for(ad.id).await?.is_empty() {
                continue;
            }
            match self.queue.dispatch(ad, now).await {
                Ok(_) => queued += 1,
                Err(e) => {
                    tracing::error!(advertisement_id = ad.id, error = %e, "Failed to queue delivery")
                }
            }
        }

        tracing::info!(ready = ready.len(), queued, "Advertisement broadcast pass finished");
        Ok(())
    }
}
