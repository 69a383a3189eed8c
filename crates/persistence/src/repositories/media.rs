//! Media library repository for database operations.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::MediaEntity;
use crate::metrics::QueryTimer;

/// Input for recording a stored upload.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub search: Option<String>,
    pub mime_prefix: Option<String>,
}

#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewMedia) -> Result<MediaEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_media");
        let result = sqlx::query_as::<_, MediaEntity>(
            r#"
            INSERT INTO media_library (file_name, original_name, mime_type, size_bytes, checksum, path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.file_name)
        .bind(&input.original_name)
        .bind(&input.mime_type)
        .bind(input.size_bytes)
        .bind(&input.checksum)
        .bind(&input.path)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<MediaEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_media_by_id");
        let result = sqlx::query_as::<_, MediaEntity>("SELECT * FROM media_library WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Deletes one item and returns the removed row so its file can be unlinked.
    pub async fn delete(&self, id: i64) -> Result<Option<MediaEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_media");
        let result = sqlx::query_as::<_, MediaEntity>(
            "DELETE FROM media_library WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<Vec<MediaEntity>, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_media");
        let result = sqlx::query_as::<_, MediaEntity>(
            "DELETE FROM media_library WHERE id = ANY($1) RETURNING *",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &MediaFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_media");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM media_library
            WHERE ($1::text IS NULL OR original_name ILIKE $1)
              AND ($2::text IS NULL OR mime_type LIKE $2)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.mime_prefix.as_deref().map(mime_prefix_pattern))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &MediaFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<MediaEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_media");
        let query = format!(
            r#"
            SELECT * FROM media_library
            WHERE ($1::text IS NULL OR original_name ILIKE $1)
              AND ($2::text IS NULL OR mime_type LIKE $2)
            ORDER BY created_at {}, id {}
            LIMIT $3 OFFSET $4
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, MediaEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.mime_prefix.as_deref().map(mime_prefix_pattern))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}

fn mime_prefix_pattern(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_prefix_pattern() {
        assert_eq!(mime_prefix_pattern("image/"), "image/%");
        assert_eq!(mime_prefix_pattern("x_y"), "x\\_y%");
    }
}
