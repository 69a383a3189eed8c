//! Bot template repository for database operations.
//!
//! At most one template per `template_type` is active. Every write that can
//! activate a template deactivates its siblings inside the same transaction;
//! the partial unique index `uq_bot_templates_active_type` backs the rule.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::BotTemplateEntity;
use crate::metrics::QueryTimer;
use domain::models::BotTemplateRequest;

/// Filters for the template list.
#[derive(Debug, Clone, Default)]
pub struct BotTemplateFilter {
    pub search: Option<String>,
    pub template_type: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct BotTemplateRepository {
    pool: PgPool,
}

impl BotTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn deactivate_siblings(
        tx: &mut Transaction<'_, Postgres>,
        template_type: &str,
        keep_id: Option<i64>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE bot_templates SET is_active = FALSE, updated_at = NOW()
            WHERE template_type = $1
              AND is_active
              AND ($2::bigint IS NULL OR id <> $2)
            "#,
        )
        .bind(template_type)
        .bind(keep_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn create(&self, input: &BotTemplateRequest) -> Result<BotTemplateEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_bot_template");
        let mut tx = self.pool.begin().await?;

        if input.is_active {
            Self::deactivate_siblings(&mut tx, &input.template_type, None).await?;
        }

        let entity = sqlx::query_as::<_, BotTemplateEntity>(
            r#"
            INSERT INTO bot_templates (template_type, name, content, variables, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&input.template_type)
        .bind(input.name.trim())
        .bind(&input.content)
        .bind(Json(&input.variables))
        .bind(input.is_active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<BotTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_bot_template_by_id");
        let result =
            sqlx::query_as::<_, BotTemplateEntity>("SELECT * FROM bot_templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// The active template of a type, if any.
    pub async fn find_active_by_type(
        &self,
        template_type: &str,
    ) -> Result<Option<BotTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_bot_template");
        let result = sqlx::query_as::<_, BotTemplateEntity>(
            "SELECT * FROM bot_templates WHERE template_type = $1 AND is_active LIMIT 1",
        )
        .bind(template_type)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replaces every editable column.
    pub async fn update(
        &self,
        id: i64,
        input: &BotTemplateRequest,
    ) -> Result<Option<BotTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_bot_template");
        let mut tx = self.pool.begin().await?;

        if input.is_active {
            Self::deactivate_siblings(&mut tx, &input.template_type, Some(id)).await?;
        }

        let entity = sqlx::query_as::<_, BotTemplateEntity>(
            r#"
            UPDATE bot_templates SET
                template_type = $2,
                name = $3,
                content = $4,
                variables = $5,
                is_active = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.template_type)
        .bind(input.name.trim())
        .bind(&input.content)
        .bind(Json(&input.variables))
        .bind(input.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        // Nothing to update: roll back the sibling deactivation.
        if entity.is_none() {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        tx.commit().await?;
        timer.record();
        Ok(entity)
    }

    /// Makes `id` the only active template of its type.
    pub async fn activate(&self, id: i64) -> Result<Option<BotTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("activate_bot_template");
        let mut tx = self.pool.begin().await?;

        let template_type = sqlx::query_scalar::<_, String>(
            "SELECT template_type FROM bot_templates WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(template_type) = template_type else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        Self::deactivate_siblings(&mut tx, &template_type, Some(id)).await?;

        let entity = sqlx::query_as::<_, BotTemplateEntity>(
            r#"
            UPDATE bot_templates SET is_active = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity))
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_bot_template");
        let result = sqlx::query("DELETE FROM bot_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_bot_templates");
        let result = sqlx::query("DELETE FROM bot_templates WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn count_active_by_type(&self, template_type: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bot_templates WHERE template_type = $1 AND is_active",
        )
        .bind(template_type)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn count(&self, filter: &BotTemplateFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_bot_templates");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bot_templates
            WHERE ($1::text IS NULL OR name ILIKE $1 OR content ILIKE $1)
              AND ($2::text IS NULL OR template_type = $2)
              AND ($3::bool IS NULL OR is_active = $3)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(&filter.template_type)
        .bind(filter.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &BotTemplateFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<BotTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_bot_templates");
        let query = format!(
            r#"
            SELECT * FROM bot_templates
            WHERE ($1::text IS NULL OR name ILIKE $1 OR content ILIKE $1)
              AND ($2::text IS NULL OR template_type = $2)
              AND ($3::bool IS NULL OR is_active = $3)
            ORDER BY created_at {}, id {}
            LIMIT $4 OFFSET $5
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, BotTemplateEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(&filter.template_type)
            .bind(filter.is_active)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
