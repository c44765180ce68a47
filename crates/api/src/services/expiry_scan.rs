//! Scheduled scan for library items nearing expiry.
//!
//! One notice and one SMS per requester per run. A requester's failure is
//! recorded and the loop moves on to the next requester.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain::models::expiry_notice::{
    days_until_expiry, format_day_count, EXPIRY_WARNING_DAYS,
};
use domain::models::{NoticeItem, NoticeItemStatus};
use domain::services::SmsSender;
use persistence::entities::LibraryItemEntity;
use persistence::repositories::{ExpiryNoticeRepository, LibraryRepository};
use serde::Serialize;
use sqlx::PgPool;

/// Run summary returned by the cron endpoint and logged by the job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub success: bool,
    pub requesters_processed: usize,
    pub items_processed: usize,
    pub notifications_sent: Vec<SentNotice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ScanError>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentNotice {
    pub requester_phone: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanError {
    pub requester_phone: String,
    pub message: String,
}

/// Numbered expiry SMS. The numbering matches the notice's stored item
/// order, which later RENEW/DELETE replies address.
pub fn format_expiry_notice(items: &[NoticeItem], now: DateTime<Utc>) -> String {
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let days = days_until_expiry(now, item.expires_at);
            format!(
                "{}. \"{}\" - {} left",
                index + 1,
                item.title,
                format_day_count(days)
            )
        })
        .collect();

    format!(
        "Your library items are expiring soon:\n\n{}\n\nReply RENEW <number> to keep an item for another 3 weeks, or DELETE <number> to remove it.",
        lines.join("\n")
    )
}

/// Group items by requester phone, preserving the query's ordering within
/// each group (ascending expiry, then id).
fn group_by_requester(items: Vec<LibraryItemEntity>) -> Vec<(String, Vec<LibraryItemEntity>)> {
    let mut groups: Vec<(String, Vec<LibraryItemEntity>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(phone, _)| *phone == item.requester_phone) {
            Some((_, group)) => group.push(item),
            None => groups.push((item.requester_phone.clone(), vec![item])),
        }
    }
    groups
}

/// Finds expiring items, records one superseding notice per requester, and
/// sends the batched SMS.
pub struct ExpiryScanService {
    library: LibraryRepository,
    notices: ExpiryNoticeRepository,
    sms: Arc<dyn SmsSender>,
}

impl ExpiryScanService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            library: LibraryRepository::new(pool.clone()),
            notices: ExpiryNoticeRepository::new(pool),
            sms,
        }
    }

    pub async fn run(&self) -> Result<ScanSummary, sqlx::Error> {
        let now = Utc::now();
        let window_end = now + Duration::days(EXPIRY_WARNING_DAYS);
        let expiring = self.library.find_expiring_between(now, window_end).await?;

        tracing::info!(count = expiring.len(), "Expiry scan found items in window");

        let groups = group_by_requester(expiring);
        let mut summary = ScanSummary {
            success: true,
            requesters_processed: 0,
            items_processed: 0,
            notifications_sent: Vec::new(),
            errors: Vec::new(),
            timestamp: now,
        };

        for (phone, items) in groups {
            summary.requesters_processed += 1;
            summary.items_processed += items.len();

            match self.notify_requester(&phone, &items, now).await {
                Ok(()) => summary.notifications_sent.push(SentNotice {
                    requester_phone: phone,
                    item_count: items.len(),
                }),
                Err(message) => {
                    tracing::error!(phone = %phone, error = %message, "Expiry notice failed");
                    summary.errors.push(ScanError {
                        requester_phone: phone,
                        message,
                    });
                }
            }
        }

        tracing::info!(
            requesters = summary.requesters_processed,
            items = summary.items_processed,
            errors = summary.errors.len(),
            "Expiry scan completed"
        );
        Ok(summary)
    }

    async fn notify_requester(
        &self,
        phone: &str,
        items: &[LibraryItemEntity],
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        let notice_items: Vec<NoticeItem> = items
            .iter()
            .map(|item| NoticeItem {
                library_item_id: item.id,
                title: item.title.clone(),
                expires_at: item.expires_at,
                status: NoticeItemStatus::Pending,
            })
            .collect();

        let notice = self
            .notices
            .create_superseding(phone, now, &notice_items)
            .await
            .map_err(|e| format!("Failed to record expiry notice: {}", e))?;

        tracing::info!(notice_id = %notice.id, phone = %phone, items = notice_items.len(), "Expiry notice recorded");

        // The notice is durable even when the SMS fails; the next scan
        // supersedes it with fresh numbering.
        let body = format_expiry_notice(&notice_items, now);
        match self.sms.send(phone, &body).await {
            domain::services::SmsResult::Failed(e) => Err(format!("SMS send failed: {}", e)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn notice_item(title: &str, expires_in_hours: i64, now: DateTime<Utc>) -> NoticeItem {
        NoticeItem {
            library_item_id: Uuid::new_v4(),
            title: title.to_string(),
            expires_at: now + Duration::hours(expires_in_hours),
            status: NoticeItemStatus::Pending,
        }
    }

    fn library_item(phone: &str, title: &str) -> LibraryItemEntity {
        let now = Utc::now();
        LibraryItemEntity {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            tmdb_id: Some(1),
            title: title.to_string(),
            media_type: domain::models::MediaKind::Movie,
            overview: "overview".to_string(),
            poster_path: None,
            release_year: None,
            rating: None,
            requester_phone: phone.to_string(),
            requester_nickname: None,
            manager_id: Uuid::new_v4(),
            status: domain::models::LibraryStatus::Active,
            added_at: now,
            expires_at: now + Duration::days(2),
            renewal_count: 0,
            renewed_at: None,
            user_requested_expiry: false,
            user_requested_expiry_at: None,
            removed_at: None,
        }
    }

    #[test]
    fn test_format_expiry_notice_numbers_and_day_counts() {
        let now = Utc::now();
        let items = vec![
            notice_item("Inception", 30, now),
            notice_item("Dune", 70, now),
        ];

        let body = format_expiry_notice(&items, now);
        assert!(body.starts_with("Your library items are expiring soon:\n\n"));
        assert!(body.contains("1. \"Inception\" - 2 days left"));
        assert!(body.contains("2. \"Dune\" - 3 days left"));
        assert!(body.contains("Reply RENEW <number>"));
        assert!(body.contains("DELETE <number>"));
    }

    #[test]
    fn test_format_expiry_notice_singular_day() {
        let now = Utc::now();
        let items = vec![notice_item("Heat", 20, now)];
        let body = format_expiry_notice(&items, now);
        assert!(body.contains("1. \"Heat\" - 1 day left"));
    }

    #[test]
    fn test_group_by_requester_preserves_order() {
        let items = vec![
            library_item("+15550000001", "A"),
            library_item("+15550000001", "B"),
            library_item("+15550000002", "C"),
        ];

        let groups = group_by_requester(items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "+15550000001");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].title, "A");
        assert_eq!(groups[0].1[1].title, "B");
        assert_eq!(groups[1].0, "+15550000002");
    }
}
