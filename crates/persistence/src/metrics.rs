//! Database metrics.
//!
//! Query latency is recorded per repository and query under
//! `facility_db_query_duration_seconds`. Queries slower than
//! [`SLOW_QUERY_THRESHOLD`] are also logged.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

pub const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(250);

/// Publish pool gauges labelled by connection state. Called by the pool
/// metrics job.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("facility_db_pool_connections", "state" => "active").set(active as f64);
    gauge!("facility_db_pool_connections", "state" => "idle").set(idle as f64);
    gauge!("facility_db_pool_max_connections").set(pool.options().get_max_connections() as f64);
}

/// Times one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("booking", "find_booking");
/// let row = sqlx::query_as::<_, BookingEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    repository: &'static str,
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(repository: &'static str, query: &'static str) -> Self {
        Self {
            repository,
            query,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let elapsed = self.start.elapsed();
        histogram!(
            "facility_db_query_duration_seconds",
            "repository" => self.repository,
            "query" => self.query
        )
        .record(elapsed.as_secs_f64());

        if is_slow(elapsed) {
            tracing::warn!(
                repository = self.repository,
                query = self.query,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow database query"
            );
        }
    }
}

fn is_slow(elapsed: Duration) -> bool {
    elapsed >= SLOW_QUERY_THRESHOLD
}
