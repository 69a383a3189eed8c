//! Pin message repository for database operations.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::PinMessageEntity;
use crate::metrics::QueryTimer;
use domain::models::PinMessageRequest;

#[derive(Debug, Clone, Default)]
pub struct PinMessageFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct PinMessageRepository {
    pool: PgPool,
}

impl PinMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &PinMessageRequest) -> Result<PinMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pin_message");
        let result = sqlx::query_as::<_, PinMessageEntity>(
            r#"
            INSERT INTO pin_messages (title, content, media_id, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.title.trim())
        .bind(&input.content)
        .bind(input.media_id)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PinMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_pin_message_by_id");
        let result =
            sqlx::query_as::<_, PinMessageEntity>("SELECT * FROM pin_messages WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        input: &PinMessageRequest,
    ) -> Result<Option<PinMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_pin_message");
        let result = sqlx::query_as::<_, PinMessageEntity>(
            r#"
            UPDATE pin_messages SET
                title = $2,
                content = $3,
                media_id = $4,
                sort_order = $5,
                is_active = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(&input.content)
        .bind(input.media_id)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_pin_message");
        let result = sqlx::query("DELETE FROM pin_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_pin_messages");
        let result = sqlx::query("DELETE FROM pin_messages WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Active pin messages in display order.
    pub async fn find_active(&self) -> Result<Vec<PinMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_pin_messages");
        let result = sqlx::query_as::<_, PinMessageEntity>(
            "SELECT * FROM pin_messages WHERE is_active ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &PinMessageFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pin_messages");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM pin_messages
            WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
              AND ($2::bool IS NULL OR is_active = $2)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &PinMessageFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<PinMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pin_messages");
        let query = format!(
            r#"
            SELECT * FROM pin_messages
            WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
              AND ($2::bool IS NULL OR is_active = $2)
            ORDER BY sort_order {}, id {}
            LIMIT $3 OFFSET $4
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, PinMessageEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.is_active)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
