//! In-process counterpart of the check-library-expiry cron endpoint.

use std::sync::Arc;

use domain::services::SmsSender;
use sqlx::PgPool;

use crate::services::ExpiryScanService;

use super::scheduler::{Job, JobFrequency};

pub struct ExpiryScanJob {
    pool: PgPool,
    sms: Arc<dyn SmsSender>,
    every_minutes: u64,
}

impl ExpiryScanJob {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>, every_minutes: u64) -> Self {
        Self {
            pool,
            sms,
            every_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpiryScanJob {
    fn name(&self) -> &'static str {
        "expiry_scan"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.every_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        let service = ExpiryScanService::new(self.pool.clone(), self.sms.clone());
        let summary = service
            .run()
            .await
            .map_err(|e| format!("Expiry scan failed: {}", e))?;

        if !summary.errors.is_empty() {
            return Err(format!(
                "Expiry scan finished with {} requester errors",
                summary.errors.len()
            ));
        }
        Ok(())
    }
}
