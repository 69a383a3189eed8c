//! Delivery of one advertisement to bot users.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::models::{Advertisement, DeliveryJob, JobPayload, MediaItem, TelegramUser};
use domain::services::{send_media_with_text, window_start, BotApi, BotApiError};
use persistence::repositories::{AdvertisementRepository, MediaRepository, TelegramUserRepository};
use sqlx::PgPool;

use crate::middleware::metrics::{record_advertisement_send, record_job_outcome};
use crate::services::bot::keyboard;
use crate::services::delivery_queue::DeliveryQueue;

/// Counts from one delivery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: u32,
    pub skipped: u32,
    pub blocked: u32,
    pub failed: u32,
}

pub struct AdvertisementDeliverer {
    pool: PgPool,
    bot: Arc<dyn BotApi>,
    media_base_url: String,
    page_size: i64,
}

impl AdvertisementDeliverer {
    pub fn new(
        pool: PgPool,
        bot: Arc<dyn BotApi>,
        media_base_url: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            pool,
            bot,
            media_base_url: media_base_url.into(),
            page_size: page_size.max(1) as i64,
        }
    }

    /// Sends the advertisement to every eligible user.
    ///
    /// Nothing is sent when the advertisement is gone or not deliverable at
    /// `now`. Per-user failures are logged and counted, never returned.
    pub async fn deliver(
        &self,
        advertisement_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DeliveryReport, sqlx::Error> {
        self.run(advertisement_id, now, None).await
    }

    /// Delivery run. With a `lease` (queue and reserved job id), the job's
    /// reservation is refreshed after every recipient page.
    async fn run(
        &self,
        advertisement_id: i64,
        now: DateTime<Utc>,
        lease: Option<(&DeliveryQueue, i64)>,
    ) -> Result<DeliveryReport, sqlx::Error> {
        let ads = AdvertisementRepository::new(self.pool.clone());
        let Some(ad) = ads.find_by_id(advertisement_id).await?.map(Advertisement::from) else {
            tracing::info!(advertisement_id, "Advertisement gone; delivery skipped");
            return Ok(DeliveryReport::default());
        };
        if !ad.is_deliverable(now) {
            tracing::info!(advertisement_id, "Advertisement not deliverable; delivery skipped");
            return Ok(DeliveryReport::default());
        }

        let media = match ad.media_id {
            Some(id) => MediaRepository::new(self.pool.clone())
                .find_by_id(id)
                .await?
                .map(MediaItem::from),
            None => None,
        };

        let window = window_start(now, ad.frequency_cap_minutes);
        let mut report = DeliveryReport::default();
        let mut after_id = 0;

        loop {
            let recipients: Vec<TelegramUser> = ads
                .find_recipients(ad.id, window, after_id, self.page_size)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            let Some(last) = recipients.last() else {
                break;
            };
            after_id = last.id;

            for user in &recipients {
                self.deliver_to(&ads, &ad, media.as_ref(), user, now, &mut report)
                    .await;
            }

            if let Some((queue, job_id)) = lease {
                if let Err(e) = queue.refresh(job_id, Utc::now()).await {
                    tracing::warn!(job_id, error = %e, "Failed to refresh job reservation");
                }
            }
        }

        tracing::info!(
            advertisement_id,
            sent = report.sent,
            skipped = report.skipped,
            blocked = report.blocked,
            failed = report.failed,
            "Advertisement delivery finished"
        );
        Ok(report)
    }

    async fn deliver_to(
        &self,
        ads: &AdvertisementRepository,
        ad: &Advertisement,
        media: Option<&MediaItem>,
        user: &TelegramUser,
        now: DateTime<Utc>,
        report: &mut DeliveryReport,
    ) {
        match ads
            .is_send_allowed(ad.id, user.id, ad.frequency_cap_minutes, now)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                report.skipped += 1;
                return;
            }
            Err(e) => {
                tracing::warn!(advertisement_id = ad.id, user_id = user.id, error = %e, "Frequency check failed");
                report.failed += 1;
                return;
            }
        }

        match self.send(ad, media, user.chat_id).await {
            Ok(()) => {
                record_advertisement_send();
                report.sent += 1;
                if let Err(e) = ads.record_send(ad.id, user.id, Utc::now()).await {
                    tracing::error!(advertisement_id = ad.id, user_id = user.id, error = %e, "Failed to record send");
                }
            }
            Err(BotApiError::Forbidden(reason)) => {
                report.blocked += 1;
                tracing::info!(user_id = user.id, reason = %reason, "User blocked the bot");
                let users = TelegramUserRepository::new(self.pool.clone());
                if let Err(e) = users.set_blocked(user.id, true).await {
                    tracing::error!(user_id = user.id, error = %e, "Failed to mark user blocked");
                }
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(advertisement_id = ad.id, user_id = user.id, error = %e, "Advertisement send failed");
            }
        }
    }

    async fn send(
        &self,
        ad: &Advertisement,
        media: Option<&MediaItem>,
        chat_id: i64,
    ) -> Result<(), BotApiError> {
        let text = message_text(ad);
        let markup = keyboard::advertisement(ad);

        match media {
            Some(media) => {
                let url = media.public_url(&self.media_base_url);
                send_media_with_text(
                    self.bot.as_ref(),
                    chat_id,
                    media.kind(),
                    &url,
                    &text,
                    markup.as_ref(),
                )
                .await?
            }
            None => self.bot.send_message(chat_id, &text, markup.as_ref()).await?,
        };
        Ok(())
    }

    /// Reserves due jobs and runs them. Returns how many jobs were processed.
    pub async fn process_due_jobs(
        &self,
        queue: &DeliveryQueue,
        batch_size: u32,
        max_attempts: u32,
    ) -> Result<usize, sqlx::Error> {
        let jobs = queue.reserve(batch_size, Utc::now()).await?;
        let count = jobs.len();

        for job in jobs {
            self.process_job(queue, &job, max_attempts).await;
        }
        Ok(count)
    }

    async fn process_job(&self, queue: &DeliveryQueue, job: &DeliveryJob, max_attempts: u32) {
        let payload = match job.decode() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(job_id = job.id, error = %e, "Undecodable delivery job dropped");
                record_job_outcome("dropped");
                if let Err(e) = queue.complete(job.id).await {
                    tracing::error!(job_id = job.id, error = %e, "Failed to drop delivery job");
                }
                return;
            }
        };

        let JobPayload::SendAdvertisement { advertisement_id } = payload;
        match self
            .run(advertisement_id, Utc::now(), Some((queue, job.id)))
            .await
        {
            Ok(_) => {
                record_job_outcome("delivered");
                if let Err(e) = queue.complete(job.id).await {
                    tracing::error!(job_id = job.id, error = %e, "Failed to remove finished job");
                }
            }
            Err(e) => match queue.retry_or_drop(job, max_attempts, Utc::now()).await {
                Ok(true) => {
                    record_job_outcome("retried");
                    tracing::warn!(job_id = job.id, attempts = job.attempts, error = %e, "Delivery failed; job released");
                }
                Ok(false) => {
                    record_job_outcome("dropped");
                    tracing::error!(job_id = job.id, attempts = job.attempts, error = %e, "Delivery failed; job dropped");
                }
                Err(release_err) => {
                    tracing::error!(job_id = job.id, error = %release_err, "Failed to release job");
                }
            },
        }
    }
}

/// Title, then description when present.
pub fn message_text(ad: &Advertisement) -> String {
    match ad.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!("{}\n\n{}", ad.title, description),
        None => ad.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::telegram::CAPTION_MAX_CHARS;
    use domain::models::{AdvertisementRequest, AdvertisementStatus};
    use domain::services::{BotCall, MockBotApi};
    use validator::Validate;

    fn media_item() -> MediaItem {
        MediaItem {
            id: 3,
            file_name: "banner.png".to_string(),
            original_name: "banner.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 2048,
            checksum: "abc".to_string(),
            path: "2026/10/banner.png".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_longest_valid_advertisement_splits_caption() {
        let request: AdvertisementRequest = serde_json::from_value(serde_json::json!({
            "title": "T".repeat(255),
            "description": "D".repeat(1024),
            "media_id": 3,
            "button_text": "Shop now",
            "button_url": "https://shop.example.com",
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let now = Utc::now();
        let ad = Advertisement {
            id: 1,
            store_id: request.store_id,
            title: request.title,
            description: request.description,
            media_id: request.media_id,
            button_text: request.button_text,
            button_url: request.button_url,
            start_date: None,
            end_date: None,
            status: AdvertisementStatus::Active,
            frequency_cap_minutes: 30,
            created_at: now,
            updated_at: now,
        };
        let text = message_text(&ad);
        assert!(text.chars().count() > CAPTION_MAX_CHARS);

        let bot = Arc::new(MockBotApi::new());
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let deliverer = AdvertisementDeliverer::new(pool, bot.clone(), "https://cdn.example.com", 10);
        deliverer.send(&ad, Some(&media_item()), 77).await.unwrap();

        let calls = bot.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            BotCall::Media { caption: None, reply_markup: None, url, .. }
                if url == "https://cdn.example.com/2026/10/banner.png"
        ));
        assert_eq!(
            calls[1],
            BotCall::Message {
                chat_id: 77,
                text,
                reply_markup: keyboard::advertisement(&ad),
            }
        );
    }

    #[test]
    fn test_message_text() {
        let now = Utc::now();
        let mut ad = Advertisement {
            id: 1,
            store_id: None,
            title: "Weekend sale".to_string(),
            description: Some("  ".to_string()),
            media_id: None,
            button_text: None,
            button_url: None,
            start_date: None,
            end_date: None,
            status: AdvertisementStatus::Active,
            frequency_cap_minutes: 30,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(message_text(&ad), "Weekend sale");

        ad.description = Some("Everything 20% off".to_string());
        assert_eq!(message_text(&ad), "Weekend sale\n\nEverything 20% off");
    }
}
