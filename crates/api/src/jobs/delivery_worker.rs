//! Drains the advertisement delivery queue.

use super::scheduler::{Job, JobError, JobFrequency};
use crate::services::{AdvertisementDeliverer, DeliveryQueue};

pub struct DeliveryWorkerJob {
    deliverer: AdvertisementDeliverer,
    queue: DeliveryQueue,
    poll_interval_secs: u64,
    batch_size: u32,
    max_attempts: u32,
}

impl DeliveryWorkerJob {
    pub fn new(
        deliverer: AdvertisementDeliverer,
        queue: DeliveryQueue,
        poll_interval_secs: u64,
        batch_size: u32,
        max_attempts: u32,
    ) -> Self {
        Self {
            deliverer,
            queue,
            poll_interval_secs,
            batch_size,
            max_attempts,
        }
    }
}

#[async_trait::async_trait]
impl Job for DeliveryWorkerJob {
    fn name(&self) -> &'static str {
        "delivery_worker"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.poll_interval_secs)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let processed = self
            .deliverer
            .process_due_jobs(&self.queue, self.batch_size, self.max_attempts)
            .await?;
        if processed > 0 {
            tracing::info!(processed, "Delivery jobs processed");
        }
        Ok(())
    }
}
