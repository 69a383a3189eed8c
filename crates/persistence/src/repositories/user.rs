//! Admin user repository for database operations.

use std::collections::HashMap;

use shared::pagination::{like_pattern, PageRequest, SortOrder};
use sqlx::{PgPool, Postgres, Transaction};

use crate::entities::{UserEntity, UserRoleEntity};
use crate::metrics::QueryTimer;
use domain::models::{Role, SUPER_ADMIN_ROLE};

/// Input for inserting or replacing a user.
#[derive(Debug, Clone)]
pub struct UserInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    /// `None` keeps the stored hash on update.
    pub password_hash: Option<&'a str>,
    pub role_ids: &'a [i64],
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role_id: Option<i64>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_roles(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        role_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Inserts a user and its role assignments. `password_hash` is required.
    pub async fn create(&self, input: &UserInput<'_>) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.email)
        .bind(input.password_hash.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_roles(&mut tx, user.id, input.role_ids).await?;
        tx.commit().await?;
        timer.record();
        Ok(user)
    }

    /// Replaces a user and its role assignments.
    pub async fn update(
        &self,
        id: i64,
        input: &UserInput<'_>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.password_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        Self::replace_roles(&mut tx, user.id, input.role_ids).await?;
        tx.commit().await?;
        timer.record();
        Ok(Some(user))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_delete_users");
        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Roles of each user in `user_ids`.
    pub async fn roles_for_users(
        &self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Role>>, sqlx::Error> {
        let timer = QueryTimer::new("roles_for_users");
        let rows = sqlx::query_as::<_, UserRoleEntity>(
            r#"
            SELECT ur.user_id, r.id, r.name, r.created_at, r.updated_at
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ANY($1)
            ORDER BY r.name
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let mut map: HashMap<i64, Vec<Role>> = HashMap::new();
        for row in rows {
            let (user_id, role) = row.into_role();
            map.entry(user_id).or_default().push(role);
        }
        Ok(map)
    }

    /// Number of Super Admins that are not in `excluded_ids`.
    pub async fn count_super_admins_excluding(
        &self,
        excluded_ids: &[i64],
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_super_admins");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT ur.user_id)
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE r.name = $1
              AND NOT (ur.user_id = ANY($2))
            "#,
        )
        .bind(SUPER_ADMIN_ROLE)
        .bind(excluded_ids)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Ids among `user_ids` that currently hold the Super Admin role.
    pub async fn super_admin_ids(&self, user_ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("super_admin_ids");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT ur.user_id
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE r.name = $1 AND ur.user_id = ANY($2)
            "#,
        )
        .bind(SUPER_ADMIN_ROLE)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE ($1::text IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1)
              AND ($2::bigint IS NULL OR EXISTS (
                  SELECT 1 FROM user_roles ur WHERE ur.user_id = u.id AND ur.role_id = $2
              ))
            "#,
        )
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.role_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        filter: &UserFilter,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let query = format!(
            r#"
            SELECT u.* FROM users u
            WHERE ($1::text IS NULL OR u.name ILIKE $1 OR u.email ILIKE $1)
              AND ($2::bigint IS NULL OR EXISTS (
                  SELECT 1 FROM user_roles ur WHERE ur.user_id = u.id AND ur.role_id = $2
              ))
            ORDER BY u.created_at {}, u.id {}
            LIMIT $3 OFFSET $4
            "#,
            order.as_sql(),
            order.as_sql()
        );
        let result = sqlx::query_as::<_, UserEntity>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.role_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
