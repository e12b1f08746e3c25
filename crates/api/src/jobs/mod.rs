//! Background job scheduler and job implementations.

mod cleanup_sessions;
mod expire_bookings;
mod pool_metrics;
mod prune_rate_limiter;
mod scheduler;

pub use cleanup_sessions::CleanupSessionsJob;
pub use expire_bookings::ExpirePendingBookingsJob;
pub use pool_metrics::PoolMetricsJob;
pub use prune_rate_limiter::PruneRateLimiterJob;
pub use scheduler::{Job, JobError, JobFrequency, JobScheduler};
