//! Expiry notice entity (database row mapping).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domain::models::expiry_notice::{DeletionRecord, NoticeErrorRecord, RenewalRecord};
use domain::models::{NoticeItem, NoticeStatus};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the expiry_notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct ExpiryNoticeEntity {
    pub id: Uuid,
    pub requester_phone: String,
    pub status: NoticeStatus,
    pub sent_at: DateTime<Utc>,
    pub item_order: Json<Vec<NoticeItem>>,
    pub renewals: Json<HashMap<Uuid, RenewalRecord>>,
    pub deletions: Json<HashMap<Uuid, DeletionRecord>>,
    pub errors: Json<Vec<NoticeErrorRecord>>,
}

impl ExpiryNoticeEntity {
    /// The ordered item list backing the numeric-index contract.
    pub fn items(&self) -> &[NoticeItem] {
        &self.item_order.0
    }

    /// Resolves a 1-based reply index against the ordered item list.
    pub fn item_at(&self, index: usize) -> Option<&NoticeItem> {
        if index == 0 {
            return None;
        }
        self.items().get(index - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::NoticeItemStatus;

    fn notice_with_items(count: usize) -> ExpiryNoticeEntity {
        let items = (0..count)
            .map(|i| NoticeItem {
                library_item_id: Uuid::new_v4(),
                title: format!("Title {}", i + 1),
                expires_at: Utc::now(),
                status: NoticeItemStatus::Pending,
            })
            .collect();
        ExpiryNoticeEntity {
            id: Uuid::new_v4(),
            requester_phone: "+15551234567".to_string(),
            status: NoticeStatus::Pending,
            sent_at: Utc::now(),
            item_order: Json(items),
            renewals: Json(HashMap::new()),
            deletions: Json(HashMap::new()),
            errors: Json(Vec::new()),
        }
    }

    #[test]
    fn test_item_at_one_based() {
        let notice = notice_with_items(3);
        assert_eq!(notice.item_at(1).unwrap().title, "Title 1");
        assert_eq!(notice.item_at(3).unwrap().title, "Title 3");
    }

    #[test]
    fn test_item_at_out_of_range() {
        let notice = notice_with_items(2);
        assert!(notice.item_at(0).is_none());
        assert!(notice.item_at(3).is_none());
    }
}
