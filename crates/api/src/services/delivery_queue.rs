//! Advertisement delivery queue.
//!
//! Jobs live in `delivery_jobs` with a JSON payload naming the
//! advertisement. Invalidation finds jobs by scanning payload text, so it
//! also catches jobs pushed by older payload layouts.

use chrono::{DateTime, Duration, Utc};
use domain::models::{Advertisement, DeliveryJob, JobPayload, DELIVERY_QUEUE};
use domain::services::{payload_references_advertisement, PAYLOAD_LIKE_PATTERN};
use persistence::repositories::DeliveryJobRepository;
use sqlx::PgPool;
use thiserror::Error;

use crate::middleware::metrics::record_jobs_invalidated;

/// Delay before each retry, indexed by attempts already made.
const RETRY_BACKOFF_SECS: [i64; 3] = [0, 60, 300];

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct DeliveryQueue {
    jobs: DeliveryJobRepository,
}

impl DeliveryQueue {
    pub fn new(pool: PgPool) -> Self {
        Self {
            jobs: DeliveryJobRepository::new(pool),
        }
    }

    /// Queues a delivery of `ad`, available once its window opens.
    pub async fn dispatch(
        &self,
        ad: &Advertisement,
        now: DateTime<Utc>,
    ) -> Result<DeliveryJob, QueueError> {
        let payload = JobPayload::SendAdvertisement {
            advertisement_id: ad.id,
        }
        .encode()?;
        let job = self
            .jobs
            .push(DELIVERY_QUEUE, &payload, ad.first_delivery_at(now))
            .await?;

        tracing::info!(
            advertisement_id = ad.id,
            job_id = job.id,
            available_at = %job.available_at,
            "Advertisement delivery queued"
        );
        Ok(job.into())
    }

    /// Ids of queued jobs whose payload references `advertisement_id`.
    pub async fn find_jobs_for(&self, advertisement_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let candidates = self.jobs.find_payloads_like(PAYLOAD_LIKE_PATTERN).await?;
        Ok(candidates
            .into_iter()
            .filter(|row| payload_references_advertisement(&row.payload, advertisement_id))
            .map(|row| row.id)
            .collect())
    }

    /// Deletes every queued job referencing `advertisement_id` and returns how
    /// many were removed.
    ///
    /// Never fails: lookup and per-job delete errors are logged and skipped.
    pub async fn invalidate(&self, advertisement_id: i64) -> u64 {
        let job_ids = match self.find_jobs_for(advertisement_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(advertisement_id, error = %e, "Failed to scan delivery jobs");
                return 0;
            }
        };

        let mut removed = 0;
        for job_id in job_ids {
            match self.jobs.delete(job_id).await {
                Ok(n) => removed += n,
                Err(e) => {
                    tracing::error!(
                        advertisement_id,
                        job_id,
                        error = %e,
                        "Failed to delete stale delivery job"
                    );
                }
            }
        }

        if removed > 0 {
            record_jobs_invalidated(removed);
            tracing::info!(advertisement_id, removed, "Stale delivery jobs removed");
        }
        removed
    }

    pub async fn invalidate_many(&self, advertisement_ids: &[i64]) -> u64 {
        let mut removed = 0;
        for id in advertisement_ids {
            removed += self.invalidate(*id).await;
        }
        removed
    }

    pub async fn reserve(
        &self,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryJob>, sqlx::Error> {
        let jobs = self.jobs.reserve(DELIVERY_QUEUE, limit as i64, now).await?;
        Ok(jobs.into_iter().map(Into::into).collect())
    }

    /// Keeps a running job's reservation alive so no other worker takes it.
    pub async fn refresh(&self, job_id: i64, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        Ok(self.jobs.refresh_reservation(job_id, now).await? > 0)
    }

    pub async fn complete(&self, job_id: i64) -> Result<(), sqlx::Error> {
        self.jobs.delete(job_id).await.map(|_| ())
    }

    /// Puts a failed job back with backoff, or drops it once `max_attempts`
    /// is reached. Returns `true` when the job was retried.
    pub async fn retry_or_drop(
        &self,
        job: &DeliveryJob,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        match retry_delay(job.attempts, max_attempts) {
            Some(delay) => {
                self.jobs.release(job.id, now + delay).await?;
                Ok(true)
            }
            None => {
                self.jobs.delete(job.id).await?;
                Ok(false)
            }
        }
    }

    pub async fn depth(&self) -> Result<i64, sqlx::Error> {
        self.jobs.count(DELIVERY_QUEUE).await
    }
}

/// Delay before the next attempt after `attempts` tries, or `None` when the
/// job is out of attempts.
pub fn retry_delay(attempts: i32, max_attempts: u32) -> Option<Duration> {
    if attempts < 0 || attempts as u32 >= max_attempts {
        return None;
    }
    let index = (attempts.max(1) as usize - 1).min(RETRY_BACKOFF_SECS.len() - 1);
    Some(Duration::seconds(RETRY_BACKOFF_SECS[index]))
}
