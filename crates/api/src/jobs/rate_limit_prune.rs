//! Drops idle rate limiter buckets.

use std::sync::Arc;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct RateLimitPruneJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimitPruneJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitPruneJob {
    fn name(&self) -> &'static str {
        "rate_limit_prune"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let before = self.limiter.tracked_clients();
        self.limiter.prune();
        tracing::debug!(
            before,
            after = self.limiter.tracked_clients(),
            "Rate limiter buckets pruned"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prune_runs() {
        let limiter = Arc::new(RateLimiterState::new(100).unwrap());
        limiter.check("198.51.100.1").unwrap();

        let job = RateLimitPruneJob::new(Arc::clone(&limiter));
        assert_eq!(job.frequency(), JobFrequency::Minutes(5));
        job.execute().await.unwrap();
        assert!(limiter.tracked_clients() <= 1);
    }
}
