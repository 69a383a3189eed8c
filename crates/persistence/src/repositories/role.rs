//! Role repository for database operations.

use shared::pagination::{like_pattern, PageRequest};
use sqlx::PgPool;

use crate::entities::{RoleEntity, RoleUsageEntity};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> Result<RoleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_role");
        let result = sqlx::query_as::<_, RoleEntity>(
            "INSERT INTO roles (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_role_by_id");
        let result = sqlx::query_as::<_, RoleEntity>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Roles with the given ids; unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_roles_by_ids");
        let result = sqlx::query_as::<_, RoleEntity>(
            "SELECT * FROM roles WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Option<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_role");
        let result = sqlx::query_as::<_, RoleEntity>(
            "UPDATE roles SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_role");
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_roles");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM roles WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(search.map(like_pattern))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Roles ordered by name, each with its holder count.
    pub async fn list_with_usage(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<RoleUsageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_roles");
        let result = sqlx::query_as::<_, RoleUsageEntity>(
            r#"
            SELECT r.id, r.name, r.created_at, r.updated_at,
                   (SELECT COUNT(*) FROM user_roles ur WHERE ur.role_id = r.id) AS users_count
            FROM roles r
            WHERE ($1::text IS NULL OR r.name ILIKE $1)
            ORDER BY r.name, r.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search.map(like_pattern))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
