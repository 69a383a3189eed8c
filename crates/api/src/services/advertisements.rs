//! Advertisement writes and their effect on queued deliveries.

use chrono::Utc;
use domain::models::common::dedup_ids;
use domain::models::{Advertisement, AdvertisementRequest, AdvertisementStatus};
use persistence::repositories::AdvertisementRepository;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::services::delivery_queue::DeliveryQueue;

pub struct AdvertisementService {
    repo: AdvertisementRepository,
    queue: DeliveryQueue,
}

impl AdvertisementService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: AdvertisementRepository::new(pool.clone()),
            queue: DeliveryQueue::new(pool),
        }
    }

    pub async fn create(&self, input: &AdvertisementRequest) -> Result<Advertisement, ApiError> {
        let ad: Advertisement = self.repo.create(input).await?.into();
        tracing::info!(advertisement_id = ad.id, title = %ad.title, "Advertisement created");

        self.schedule(&ad).await;
        Ok(ad)
    }

    /// Replaces an advertisement. When a delivery-governing field changed,
    /// queued jobs are dropped and a fresh one is queued if it stays active.
    pub async fn update(
        &self,
        id: i64,
        input: &AdvertisementRequest,
    ) -> Result<Advertisement, ApiError> {
        let before: Advertisement = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Advertisement", id))?
            .into();

        let after: Advertisement = self
            .repo
            .update(id, input)
            .await?
            .ok_or_else(|| ApiError::not_found("Advertisement", id))?
            .into();

        if before.delivery_changed(&after) {
            self.queue.invalidate(id).await;
            self.schedule(&after).await;
        }

        tracing::info!(advertisement_id = id, "Advertisement updated");
        Ok(after)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if self.repo.soft_delete(id).await? == 0 {
            return Err(ApiError::not_found("Advertisement", id));
        }
        self.queue.invalidate(id).await;

        tracing::info!(advertisement_id = id, "Advertisement deleted");
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, ApiError> {
        let deleted = self.repo.bulk_soft_delete(&dedup_ids(ids)).await?;
        self.queue.invalidate_many(&deleted).await;

        tracing::info!(count = deleted.len(), "Advertisements bulk deleted");
        Ok(deleted.len() as u64)
    }

    /// Sets the status of many advertisements. Only rows whose status
    /// actually changed have their jobs replaced.
    pub async fn bulk_set_status(
        &self,
        ids: &[i64],
        status: AdvertisementStatus,
    ) -> Result<u64, ApiError> {
        let changed: Vec<Advertisement> = self
            .repo
            .bulk_set_status(&dedup_ids(ids), status)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        for ad in &changed {
            self.queue.invalidate(ad.id).await;
            self.schedule(ad).await;
        }

        tracing::info!(count = changed.len(), status = %status, "Advertisement status bulk updated");
        Ok(changed.len() as u64)
    }

    /// Queues a delivery for an active advertisement whose window has not
    /// closed. Failures are logged; the write that triggered it stands.
    async fn schedule(&self, ad: &Advertisement) {
        let now = Utc::now();
        if ad.status != AdvertisementStatus::Active || ad.is_expired(now) {
            return;
        }
        if let Err(e) = self.queue.dispatch(ad, now).await {
            tracing::error!(advertisement_id = ad.id, error = %e, "Failed to queue delivery");
        }
    }
}
