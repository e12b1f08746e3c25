//! Drops idle keys from the rate limiter so memory stays bounded.

use std::sync::Arc;

use super::scheduler::{Job, JobError, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct PruneRateLimiterJob {
    limiter: Arc<RateLimiterState>,
}

impl PruneRateLimiterJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for PruneRateLimiterJob {
    fn name(&self) -> &'static str {
        "prune_rate_limiter"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<u64, JobError> {
        self.limiter.prune();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prune_keeps_limiter_usable() {
        let limiter = Arc::new(RateLimiterState::new(2).unwrap());
        assert!(limiter.check("ip:10.0.0.1").is_ok());

        let job = PruneRateLimiterJob::new(limiter.clone());
        job.execute().await.unwrap();

        assert!(limiter.check("ip:10.0.0.1").is_ok());
        assert!(limiter.check("ip:10.0.0.1").is_err());
    }
}
