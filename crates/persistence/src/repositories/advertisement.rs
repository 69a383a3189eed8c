//! Advertisement repository for database operations.
//!
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are excluded from every
//! query and mutation.

use chrono::{DateTime, Utc};
use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::{AdvertisementEntity, AdvertisementSendEntity, TelegramUserEntity};
use crate::metrics::QueryTimer;
use domain::models::{AdvertisementRequest, AdvertisementSortField, AdvertisementStatus};
use domain::services::frequency_cap;

/// Filters for the advertisement list.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementFilter {
    pub search: Option<String>,
    pub status: Option<AdvertisementStatus>,
    pub store_id: Option<i64>,
}

/// Repository for advertisement-related database operations.
#[derive(Clone)]
pub struct AdvertisementRepository {
    pool: PgPool,
}

impl AdvertisementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &AdvertisementRequest,
    ) -> Result<AdvertisementEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_advertisement");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            INSERT INTO advertisements (
                store_id, title, description, media_id, button_text, button_url,
                start_date, end_date, status, frequency_cap_minutes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(input.store_id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.media_id)
        .bind(&input.button_text)
        .bind(&input.button_url)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.status.as_str())
        .bind(input.frequency_cap_minutes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdvertisementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_advertisement_by_id");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            "SELECT * FROM advertisements WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replaces every editable column.
    pub async fn update(
        &self,
        id: i64,
        input: &AdvertisementRequest,
    ) -> Result<Option<AdvertisementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_advertisement");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            UPDATE advertisements SET
                store_id = $2,
                title = $3,
                description = $4,
                media_id = $5,
                button_text = $6,
                button_url = $7,
                start_date = $8,
                end_date = $9,
                status = $10,
                frequency_cap_minutes = $11,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.store_id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.media_id)
        .bind(&input.button_text)
        .bind(&input.button_url)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.status.as_str())
        .bind(input.frequency_cap_minutes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft-deletes one advertisement. Returns the number of rows affected.
    pub async fn soft_delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_advertisement");
        let result = sqlx::query(
            "UPDATE advertisements SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Soft-deletes many advertisements and returns the ids that were live.
    pub async fn bulk_soft_delete(&self, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("bulk_soft_delete_advertisements");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE advertisements SET deleted_at = NOW()
            WHERE id = ANY($1) AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Sets the status of many advertisements and returns the rows whose
    /// status actually changed.
    pub async fn bulk_set_status(
        &self,
        ids: &[i64],
        status: AdvertisementStatus,
    ) -> Result<Vec<AdvertisementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("bulk_update_advertisements");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            UPDATE advertisements SET status = $2, updated_at = NOW()
            WHERE id = ANY($1) AND deleted_at IS NULL AND status <> $2
            RETURNING *
            "#,
        )
        .bind(ids)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &AdvertisementFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_advertisements");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM advertisements
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::bigint IS NULL OR store_id = $3)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.store_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &AdvertisementFilter,
        sort: AdvertisementSortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<AdvertisementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_advertisements");
        let query = format!(
            r#"
            SELECT * FROM advertisements
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::bigint IS NULL OR store_id = $3)
            ORDER BY {} {} NULLS LAST, id {}
            LIMIT $4 OFFSET $5
            "#,
            sort.as_sql_column(),
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, AdvertisementEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.store_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Advertisements that are active and inside their window at `now`.
    pub async fn ready_to_send(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdvertisementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("advertisements_ready_to_send");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            SELECT * FROM advertisements
            WHERE deleted_at IS NULL
              AND status = 'active'
              AND (start_date IS NULL OR start_date <= $1)
              AND (end_date IS NULL OR end_date >= $1)
            ORDER BY id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delivery log of one advertisement, newest first.
    pub async fn send_history(
        &self,
        advertisement_id: i64,
        telegram_user_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<AdvertisementSendEntity>, sqlx::Error> {
        let timer = QueryTimer::new("advertisement_send_history");
        let result = sqlx::query_as::<_, AdvertisementSendEntity>(
            r#"
            SELECT * FROM advertisement_sends
            WHERE advertisement_id = $1
              AND ($2::bigint IS NULL OR telegram_user_id = $2)
            ORDER BY sent_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(advertisement_id)
        .bind(telegram_user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_sends(
        &self,
        advertisement_id: i64,
        telegram_user_id: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_advertisement_sends");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM advertisement_sends
            WHERE advertisement_id = $1
              AND ($2::bigint IS NULL OR telegram_user_id = $2)
            "#,
        )
        .bind(advertisement_id)
        .bind(telegram_user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Most recent send of an advertisement to a user.
    pub async fn last_send(
        &self,
        advertisement_id: i64,
        telegram_user_id: i64,
    ) -> Result<Option<AdvertisementSendEntity>, sqlx::Error> {
        let timer = QueryTimer::new("advertisement_last_send");
        let result = sqlx::query_as::<_, AdvertisementSendEntity>(
            r#"
            SELECT * FROM advertisement_sends
            WHERE advertisement_id = $1 AND telegram_user_id = $2
            ORDER BY sent_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(advertisement_id)
        .bind(telegram_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn record_send(
        &self,
        advertisement_id: i64,
        telegram_user_id: i64,
        sent_at: DateTime<Utc>,
    ) -> Result<AdvertisementSendEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_advertisement_send");
        let result = sqlx::query_as::<_, AdvertisementSendEntity>(
            r#"
            INSERT INTO advertisement_sends (advertisement_id, telegram_user_id, sent_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(advertisement_id)
        .bind(telegram_user_id)
        .bind(sent_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Applies the frequency cap to the latest send of the advertisement to
    /// the user.
    pub async fn is_send_allowed(
        &self,
        advertisement_id: i64,
        telegram_user_id: i64,
        cap_minutes: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let last = self.last_send(advertisement_id, telegram_user_id).await?;
        Ok(frequency_cap::is_send_allowed(
            last.map(|send| send.sent_at),
            cap_minutes,
            now,
        ))
    }

    /// Non-blocked users with no send of the advertisement since
    /// `window_start`, in id order after `after_id`.
    pub async fn find_recipients(
        &self,
        advertisement_id: i64,
        window_start: DateTime<Utc>,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<TelegramUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("advertisement_find_recipients");
        let result = sqlx::query_as::<_, TelegramUserEntity>(
            r#"
            SELECT tu.* FROM telegram_users tu
            WHERE tu.is_blocked = FALSE
              AND tu.id > $3
              AND NOT EXISTS (
                  SELECT 1 FROM advertisement_sends s
                  WHERE s.advertisement_id = $1
                    AND s.telegram_user_id = tu.id
                    AND s.sent_at >= $2
              )
            ORDER BY tu.id
            LIMIT $4
            "#,
        )
        .bind(advertisement_id)
        .bind(window_start)
        .bind(after_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
