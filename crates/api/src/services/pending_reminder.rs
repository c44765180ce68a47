//! Scheduled reminder to managers with requests awaiting review.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::services::SmsSender;
use persistence::entities::MediaRequestEntity;
use persistence::repositories::{ManagerRepository, MediaRequestRepository};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub success: bool,
    pub managers_processed: usize,
    pub notifications_sent: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReminderError>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderError {
    pub manager_id: Uuid,
    pub message: String,
}

pub fn reminder_message(pending_count: usize) -> String {
    let noun = if pending_count == 1 {
        "request"
    } else {
        "requests"
    };
    format!(
        "StreamRequest: You have {} pending media {} awaiting your review. Login to your dashboard to manage them.",
        pending_count, noun
    )
}

fn group_by_manager(requests: Vec<MediaRequestEntity>) -> Vec<(Uuid, usize)> {
    let mut groups: Vec<(Uuid, usize)> = Vec::new();
    for request in requests {
        match groups.iter_mut().find(|(id, _)| *id == request.manager_id) {
            Some((_, count)) => *count += 1,
            None => groups.push((request.manager_id, 1)),
        }
    }
    groups
}

/// Counts pending requests per manager and sends one reminder SMS each.
pub struct PendingReminderService {
    requests: MediaRequestRepository,
    managers: ManagerRepository,
    sms: Arc<dyn SmsSender>,
}

impl PendingReminderService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            requests: MediaRequestRepository::new(pool.clone()),
            managers: ManagerRepository::new(pool),
            sms,
        }
    }

    pub async fn run(&self) -> Result<ReminderSummary, sqlx::Error> {
        let now = Utc::now();
        let pending = self.requests.find_pending().await?;

        tracing::info!(count = pending.len(), "Pending request reminder scan");

        let mut summary = ReminderSummary {
            success: true,
            managers_processed: 0,
            notifications_sent: 0,
            errors: Vec::new(),
            timestamp: now,
        };

        for (manager_id, count) in group_by_manager(pending) {
            summary.managers_processed += 1;

            let manager = match self.managers.find_by_id(manager_id).await? {
                Some(manager) => manager,
                None => {
                    tracing::warn!(manager_id = %manager_id, "Pending requests reference missing manager");
                    summary.errors.push(ReminderError {
                        manager_id,
                        message: "Manager not found".to_string(),
                    });
                    continue;
                }
            };

            match self
                .sms
                .send(&manager.phone_number, &reminder_message(count))
                .await
            {
                domain::services::SmsResult::Failed(e) => {
                    tracing::error!(manager_id = %manager_id, error = %e, "Reminder SMS failed");
                    summary.errors.push(ReminderError {
                        manager_id,
                        message: format!("SMS send failed: {}", e),
                    });
                }
                _ => summary.notifications_sent += 1,
            }
        }

        tracing::info!(
            managers = summary.managers_processed,
            sent = summary.notifications_sent,
            errors = summary.errors.len(),
            "Pending request reminders completed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_message_singular() {
        assert_eq!(
            reminder_message(1),
            "StreamRequest: You have 1 pending media request awaiting your review. Login to your dashboard to manage them."
        );
    }

    #[test]
    fn test_reminder_message_plural() {
        assert_eq!(
            reminder_message(4),
            "StreamRequest: You have 4 pending media requests awaiting your review. Login to your dashboard to manage them."
        );
    }
}
