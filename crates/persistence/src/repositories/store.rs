//! Store repository for database operations.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::StoreEntity;
use crate::metrics::QueryTimer;
use domain::models::{StoreRequest, StoreSortField};

/// Filters for the store list.
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Repository for store-related database operations.
#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &StoreRequest) -> Result<StoreEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_store");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            INSERT INTO stores (name, description, address, phone, logo_media_id, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.logo_media_id)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_store_by_id");
        let result = sqlx::query_as::<_, StoreEntity>("SELECT * FROM stores WHERE id = $1")
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
        input: &StoreRequest,
    ) -> Result<Option<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_store");
        let result = sqlx::query_as::<_, StoreEntity>(
            r#"
            UPDATE stores SET
                name = $2,
                description = $3,
                address = $4,
                phone = $5,
                logo_media_id = $6,
                is_active = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(input.logo_media_id)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_store");
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_stores");
        let result = sqlx::query("DELETE FROM stores WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn bulk_set_active(&self, ids: &[i64], is_active: bool) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_update_stores");
        let result = sqlx::query(
            "UPDATE stores SET is_active = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn count(&self, filter: &StoreFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_stores");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM stores
            WHERE ($1::text IS NULL OR name ILIKE $1 OR address ILIKE $1)
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
        filter: &StoreFilter,
        sort: StoreSortField,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<StoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_stores");
        let query = format!(
            r#"
            SELECT * FROM stores
            WHERE ($1::text IS NULL OR name ILIKE $1 OR address ILIKE $1)
              AND ($2::bool IS NULL OR is_active = $2)
            ORDER BY {} {}, id {}
            LIMIT $3 OFFSET $4
            "#,
            sort.as_sql_column(),
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, StoreEntity>(&query)
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
