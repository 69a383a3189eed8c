//! Database metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Records connection pool gauges. Called periodically by a background job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Records the number of queued jobs in a delivery queue.
pub fn record_queue_depth(queue: &str, depth: i64) {
    gauge!("delivery_queue_depth", "queue" => queue.to_string()).set(depth as f64);
}

/// Times one repository call.
///
/// ```ignore
/// let timer = QueryTimer::new("find_store_by_id");
/// let result = sqlx::query_as::<_, StoreEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_keeps_name() {
        let timer = QueryTimer::new("list_stores");
        assert_eq!(timer.query_name, "list_stores");
        // Without an installed recorder this is a no-op.
        timer.record();
    }

    #[test]
    fn test_queue_depth_without_recorder() {
        record_queue_depth("advertisements", 3);
    }
}
