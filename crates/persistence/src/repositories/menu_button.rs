//! Menu button repository for database operations.

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::PgPool;

use crate::entities::MenuButtonEntity;
use crate::metrics::QueryTimer;
use domain::models::MenuButtonRequest;

/// Filters for the menu button list.
#[derive(Debug, Clone, Default)]
pub struct MenuButtonFilter {
    pub search: Option<String>,
    pub parent_id: Option<i64>,
    pub root_only: bool,
}

#[derive(Clone)]
pub struct MenuButtonRepository {
    pool: PgPool,
}

impl MenuButtonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &MenuButtonRequest) -> Result<MenuButtonEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_menu_button");
        let result = sqlx::query_as::<_, MenuButtonEntity>(
            r#"
            INSERT INTO menu_buttons (
                parent_id, label, button_type, content, url, media_id, sort_order, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(input.parent_id)
        .bind(input.label.trim())
        .bind(input.button_type.as_str())
        .bind(&input.content)
        .bind(&input.url)
        .bind(input.media_id)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menu_button_by_id");
        let result =
            sqlx::query_as::<_, MenuButtonEntity>("SELECT * FROM menu_buttons WHERE id = $1")
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
        input: &MenuButtonRequest,
    ) -> Result<Option<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_menu_button");
        let result = sqlx::query_as::<_, MenuButtonEntity>(
            r#"
            UPDATE menu_buttons SET
                parent_id = $2,
                label = $3,
                button_type = $4,
                content = $5,
                url = $6,
                media_id = $7,
                sort_order = $8,
                is_active = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.parent_id)
        .bind(input.label.trim())
        .bind(input.button_type.as_str())
        .bind(&input.content)
        .bind(&input.url)
        .bind(input.media_id)
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_menu_button");
        let result = sqlx::query("DELETE FROM menu_buttons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Deletes many buttons. Rows that still have children are left alone.
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_menu_buttons");
        let result = sqlx::query(
            r#"
            DELETE FROM menu_buttons
            WHERE id = ANY($1)
              AND NOT EXISTS (SELECT 1 FROM menu_buttons c WHERE c.parent_id = menu_buttons.id)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn count_children(&self, id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_menu_button_children");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menu_buttons WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Ids among `ids` that have at least one child.
    pub async fn ids_with_children(&self, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("menu_buttons_with_children");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT parent_id FROM menu_buttons
            WHERE parent_id = ANY($1)
            ORDER BY parent_id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Ancestor chain of a button, nearest first, including the button itself.
    pub async fn ancestor_ids(&self, id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("menu_button_ancestors");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            WITH RECURSIVE chain (id, parent_id, depth) AS (
                SELECT id, parent_id, 0 FROM menu_buttons WHERE id = $1
                UNION ALL
                SELECT m.id, m.parent_id, c.depth + 1
                FROM menu_buttons m
                JOIN chain c ON m.id = c.parent_id
                WHERE c.depth < 64
            )
            SELECT id FROM chain ORDER BY depth
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Every button, for tree assembly.
    pub async fn find_all(&self) -> Result<Vec<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_all_menu_buttons");
        let result = sqlx::query_as::<_, MenuButtonEntity>(
            "SELECT * FROM menu_buttons ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active children of `parent_id`, or active root buttons when `None`.
    pub async fn find_active_children(
        &self,
        parent_id: Option<i64>,
    ) -> Result<Vec<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_menu_children");
        let result = sqlx::query_as::<_, MenuButtonEntity>(
            r#"
            SELECT * FROM menu_buttons
            WHERE is_active
              AND parent_id IS NOT DISTINCT FROM $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active root button whose label matches `label` exactly.
    pub async fn find_active_root_by_label(
        &self,
        label: &str,
    ) -> Result<Option<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_menu_root_by_label");
        let result = sqlx::query_as::<_, MenuButtonEntity>(
            r#"
            SELECT * FROM menu_buttons
            WHERE is_active AND parent_id IS NULL AND label = $1
            ORDER BY sort_order, id
            LIMIT 1
            "#,
        )
        .bind(label)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &MenuButtonFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_menu_buttons");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM menu_buttons
            WHERE ($1::text IS NULL OR label ILIKE $1)
              AND ($2::bigint IS NULL OR parent_id = $2)
              AND (NOT $3 OR parent_id IS NULL)
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.parent_id)
        .bind(filter.root_only)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &MenuButtonFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<MenuButtonEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_menu_buttons");
        let query = format!(
            r#"
            SELECT * FROM menu_buttons
            WHERE ($1::text IS NULL OR label ILIKE $1)
              AND ($2::bigint IS NULL OR parent_id = $2)
              AND (NOT $3 OR parent_id IS NULL)
            ORDER BY sort_order {}, id {}
            LIMIT $4 OFFSET $5
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, MenuButtonEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.parent_id)
            .bind(filter.root_only)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
