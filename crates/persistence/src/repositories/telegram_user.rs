//! Telegram user repository for database operations.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::TelegramUserEntity;
use crate::metrics::QueryTimer;
use domain::models::TelegramUserProfile;

#[derive(Debug, Clone, Default)]
pub struct TelegramUserFilter {
    pub search: Option<String>,
    pub is_blocked: Option<bool>,
}

#[derive(Clone)]
pub struct TelegramUserRepository {
    pool: PgPool,
}

impl TelegramUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or refreshes a chat user from an inbound update.
    ///
    /// Writing to the bot again lifts a block recorded after a failed delivery.
    pub async fn upsert(&self, profile: &TelegramUserProfile) -> Result<TelegramUserEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_telegram_user");
        let result = sqlx::query_as::<_, TelegramUserEntity>(
            r#"
            INSERT INTO telegram_users (
                telegram_id, chat_id, username, first_name, last_name, language_code, last_seen_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (telegram_id) DO UPDATE SET
                chat_id = EXCLUDED.chat_id,
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                language_code = EXCLUDED.language_code,
                is_blocked = FALSE,
                last_seen_at = NOW()
            RETURNING *
            "#,
        )
        .bind(profile.telegram_id)
        .bind(profile.chat_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Records the first `/start`; later calls keep the original timestamp.
    pub async fn mark_started(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_telegram_user_started");
        let result = sqlx::query(
            "UPDATE telegram_users SET started_at = COALESCE(started_at, NOW()) WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn set_blocked(
        &self,
        id: i64,
        is_blocked: bool,
    ) -> Result<Option<TelegramUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_telegram_user_blocked");
        let result = sqlx::query_as::<_, TelegramUserEntity>(
            "UPDATE telegram_users SET is_blocked = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_blocked)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<TelegramUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_telegram_user_by_id");
        let result =
            sqlx::query_as::<_, TelegramUserEntity>("SELECT * FROM telegram_users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &TelegramUserFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_telegram_users");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM telegram_users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::bool IS NULL OR is_blocked = $2)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.is_blocked)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &TelegramUserFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<TelegramUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_telegram_users");
        let query = format!(
            r#"
            SELECT * FROM telegram_users
            WHERE ($1::text IS NULL OR username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::bool IS NULL OR is_blocked = $2)
            ORDER BY last_seen_at {}, id {}
            LIMIT $3 OFFSET $4
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, TelegramUserEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.is_blocked)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
