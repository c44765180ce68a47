//! Dashboard-initiated library mutations: renew and remove.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::models::library_item::{RemoveLibraryItemRequest, RenewLibraryItemRequest};
use domain::services::SmsSender;
use persistence::repositories::LibraryRepository;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::renewal::format_expiry_date;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryActionSummary {
    pub success: bool,
    pub item_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub sms_sent: bool,
}

pub fn renewal_notice_message(title: &str, new_expiry: DateTime<Utc>) -> String {
    format!(
        "Your media \"{}\" has been renewed. It will now be available until {}.",
        title,
        format_expiry_date(new_expiry)
    )
}

pub fn removal_notice_message(title: &str) -> String {
    format!(
        "\"{}\" has been removed from the library. Contact your media server administrator if you need it restored.",
        title
    )
}

/// Applies manager-side renewals and removals and notifies the requester.
pub struct LibraryAdminService {
    library: LibraryRepository,
    sms: Arc<dyn SmsSender>,
}

impl LibraryAdminService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            library: LibraryRepository::new(pool),
            sms,
        }
    }

    /// Push an item's expiry to the date the dashboard chose.
    pub async fn renew(
        &self,
        request: &RenewLibraryItemRequest,
    ) -> Result<LibraryActionSummary, ApiError> {
        let item = self
            .library
            .set_expiry(request.item_id, request.new_expiry_date, Utc::now())
            .await?
            .ok_or_else(|| ApiError::NotFound("Library item not found".to_string()))?;

        tracing::info!(
            library_item_id = %item.id,
            new_expiry = %request.new_expiry_date,
            "Library item renewed from dashboard"
        );

        let sms_sent = self
            .sms
            .send(
                &item.requester_phone,
                &renewal_notice_message(&item.title, request.new_expiry_date),
            )
            .await
            .is_sent();

        Ok(LibraryActionSummary {
            success: true,
            item_id: item.id,
            title: item.title,
            expires_at: Some(request.new_expiry_date),
            sms_sent,
        })
    }

    /// Remove an item from the library entirely.
    pub async fn remove(
        &self,
        request: &RemoveLibraryItemRequest,
    ) -> Result<LibraryActionSummary, ApiError> {
        let item = self
            .library
            .mark_removed(request.item_id, Utc::now())
            .await?
            .ok_or_else(|| ApiError::NotFound("Library item not found".to_string()))?;

        tracing::info!(library_item_id = %item.id, "Library item removed from dashboard");

        let sms_sent = self
            .sms
            .send(&item.requester_phone, &removal_notice_message(&item.title))
            .await
            .is_sent();

        Ok(LibraryActionSummary {
            success: true,
            item_id: item.id,
            title: item.title,
            expires_at: None,
            sms_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_renewal_notice_message() {
        let expiry = Utc.with_ymd_and_hms(2026, 9, 16, 0, 0, 0).unwrap();
        assert_eq!(
            renewal_notice_message("Inception", expiry),
            "Your media \"Inception\" has been renewed. It will now be available until 9/16/2026."
        );
    }

    #[test]
    fn test_removal_notice_message() {
        assert_eq!(
            removal_notice_message("Dune"),
            "\"Dune\" has been removed from the library. Contact your media server administrator if you need it restored."
        );
    }
}
