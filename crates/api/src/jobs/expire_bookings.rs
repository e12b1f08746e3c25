//! Cancels pending court and package bookings nobody confirmed in time.

use chrono::{DateTime, Duration, Utc};
use persistence::repositories::{BookingRepository, PackageRepository};
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobError, JobFrequency};

pub struct ExpirePendingBookingsJob {
    bookings: BookingRepository,
    packages: PackageRepository,
    ttl_hours: i64,
}

impl ExpirePendingBookingsJob {
    pub fn new(pool: PgPool, ttl_hours: i64) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            packages: PackageRepository::new(pool),
            ttl_hours,
        }
    }

    /// Pending bookings created before this instant are expired.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(self.ttl_hours)
    }
}

#[async_trait::async_trait]
impl Job for ExpirePendingBookingsJob {
    fn name(&self) -> &'static str {
        "expire_pending_bookings"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(15)
    }

    async fn execute(&self) -> Result<u64, JobError> {
        let cutoff = self.cutoff(Utc::now());
        let courts = self.bookings.expire_pending(cutoff).await?;
        let stays = self.packages.expire_pending(cutoff).await?;

        if courts + stays > 0 {
            info!(
                court_bookings = courts,
                package_bookings = stays,
                cutoff = %cutoff,
                "Expired pending bookings"
            );
        }
        Ok(courts + stays)
    }
}
