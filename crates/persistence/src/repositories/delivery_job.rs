//! Delivery job queue repository.
//!
//! Jobs are reserved with `FOR UPDATE SKIP LOCKED`, so concurrent workers
//! never pick up the same row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{DeliveryJobEntity, JobPayloadRow};
use crate::metrics::QueryTimer;

/// Reservations not refreshed within this window are considered abandoned
/// and picked up again. Workers refresh theirs with
/// [`DeliveryJobRepository::refresh_reservation`] while a job runs.
const RESERVATION_TIMEOUT_SECS: i64 = 900;

#[derive(Clone)]
pub struct DeliveryJobRepository {
    pool: PgPool,
}

impl DeliveryJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn push(
        &self,
        queue: &str,
        payload: &str,
        available_at: DateTime<Utc>,
    ) -> Result<DeliveryJobEntity, sqlx::Error> {
        let timer = QueryTimer::new("push_delivery_job");
        let result = sqlx::query_as::<_, DeliveryJobEntity>(
            r#"
            INSERT INTO delivery_jobs (queue, payload, available_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(queue)
        .bind(payload)
        .bind(available_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reserves up to `limit` due jobs and bumps their attempt counters.
    pub async fn reserve(
        &self,
        queue: &str,
        limit: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryJobEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reserve_delivery_jobs");
        let result = sqlx::query_as::<_, DeliveryJobEntity>(
            r#"
            UPDATE delivery_jobs SET reserved_at = $3, attempts = attempts + 1
            WHERE id IN (
                SELECT id FROM delivery_jobs
                WHERE queue = $1
                  AND available_at <= $3
                  AND (reserved_at IS NULL OR reserved_at < $3 - make_interval(secs => $4))
                ORDER BY available_at, id
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(queue)
        .bind(limit)
        .bind(now)
        .bind(RESERVATION_TIMEOUT_SECS as f64)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Moves the reservation of a running job forward to `now`. Returns 0 when
    /// the job is gone.
    pub async fn refresh_reservation(
        &self,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("refresh_delivery_job_reservation");
        let result = sqlx::query(
            "UPDATE delivery_jobs SET reserved_at = $2 WHERE id = $1 AND reserved_at IS NOT NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Returns a reserved job to the queue, available again at `available_at`.
    pub async fn release(&self, id: i64, available_at: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("release_delivery_job");
        let result = sqlx::query(
            "UPDATE delivery_jobs SET reserved_at = NULL, available_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(available_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_delivery_job");
        let result = sqlx::query("DELETE FROM delivery_jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Jobs whose payload matches a `LIKE` pattern; callers confirm each match.
    pub async fn find_payloads_like(&self, pattern: &str) -> Result<Vec<JobPayloadRow>, sqlx::Error> {
        let timer = QueryTimer::new("find_delivery_jobs_by_payload");
        let result = sqlx::query_as::<_, JobPayloadRow>(
            "SELECT id, payload FROM delivery_jobs WHERE payload LIKE $1 ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, queue: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM delivery_jobs WHERE queue = $1")
            .bind(queue)
            .fetch_one(&self.pool)
            .await
    }
}
