//! Deletes refresh sessions that expired or were revoked long ago.

use chrono::{Duration, Utc};
use persistence::repositories::UserRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobError, JobFrequency};

pub struct CleanupSessionsJob {
    users: UserRepository,
    retention_days: i64,
}

impl CleanupSessionsJob {
    pub fn new(pool: PgPool, retention_days: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupSessionsJob {
    fn name(&self) -> &'static str {
        "cleanup_sessions"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<u64, JobError> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let deleted = self.users.delete_stale_sessions(cutoff).await?;
        if deleted > 0 {
            info!(deleted, retention_days = self.retention_days, "Deleted stale sessions");
        }
        Ok(deleted)
    }
}
