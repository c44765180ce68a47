//! In-process counterpart of the notify-pending-requests cron endpoint.

use std::sync::Arc;

use domain::services::SmsSender;
use sqlx::PgPool;

use crate::services::PendingReminderService;

use super::scheduler::{Job, JobFrequency};

pub struct PendingReminderJob {
    pool: PgPool,
    sms: Arc<dyn SmsSender>,
    every_minutes: u64,
}

impl PendingReminderJob {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>, every_minutes: u64) -> Self {
        Self {
            pool,
            sms,
            every_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Job for PendingReminderJob {
    fn name(&self) -> &'static str {
        "pending_reminder"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.every_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        let service = PendingReminderService::new(self.pool.clone(), self.sms.clone());
        let summary = service
            .run()
            .await
            .map_err(|e| format!("Pending request reminder failed: {}", e))?;

        if !summary.errors.is_empty() {
            return Err(format!(
                "Reminder finished with {} manager errors",
                summary.errors.len()
            ));
        }
        Ok(())
    }
}
