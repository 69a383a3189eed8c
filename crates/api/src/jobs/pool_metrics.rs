//! Periodic pool and queue gauges.

use domain::models::DELIVERY_QUEUE;
use sqlx::PgPool;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::services::DeliveryQueue;

pub struct PoolMetricsJob {
    pool: PgPool,
    queue: DeliveryQueue,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            queue: DeliveryQueue::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(10)
    }

    async fn execute(&self) -> Result<(), JobError> {
        persistence::metrics::record_pool_metrics(&self.pool);
        let depth = self.queue.depth().await?;
        persistence::metrics::record_queue_depth(DELIVERY_QUEUE, depth);
        Ok(())
    }
}
