//! RENEW n / DELETE n replies against the most recent expiry notice.

use chrono::{DateTime, Duration, Utc};
use domain::models::library_item;
use persistence::entities::{ExpiryNoticeEntity, LibraryItemEntity};
use persistence::repositories::{ExpiryNoticeRepository, LibraryRepository};
use sqlx::PgPool;

const RENEW_USAGE_REPLY: &str = "Please specify a valid item number (e.g., RENEW 1)";
const DELETE_USAGE_REPLY: &str = "Please specify a valid item number (e.g., DELETE 1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCommand {
    Renew,
    Delete,
}

impl NoticeCommand {
    fn usage_reply(&self) -> &'static str {
        match self {
            NoticeCommand::Renew => RENEW_USAGE_REPLY,
            NoticeCommand::Delete => DELETE_USAGE_REPLY,
        }
    }

    fn no_notice_reply(&self) -> String {
        let verb = match self {
            NoticeCommand::Renew => "renew",
            NoticeCommand::Delete => "delete",
        };
        format!(
            "No recent expiring items found. Please wait for an expiry notification before attempting to {}.",
            verb
        )
    }
}

/// Locale-style date used in renewal confirmations, e.g. "9/16/2026".
pub fn format_expiry_date(date: DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Resolves notice indexes and applies renew/force-expire mutations.
pub struct RenewalService {
    notices: ExpiryNoticeRepository,
    library: LibraryRepository,
}

impl RenewalService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            notices: ExpiryNoticeRepository::new(pool.clone()),
            library: LibraryRepository::new(pool),
        }
    }

    /// Handle a "renew n" or "delete n" reply. `index` is the parsed 1-based
    /// number, or None when the token after the command was not a number.
    pub async fn handle(
        &self,
        phone: &str,
        command: NoticeCommand,
        index: Option<usize>,
    ) -> Result<String, sqlx::Error> {
        let index = match index {
            Some(index) if index >= 1 => index,
            _ => return Ok(command.usage_reply().to_string()),
        };

        let notice = match self.notices.find_latest_pending(phone).await? {
            Some(notice) => notice,
            None => return Ok(command.no_notice_reply()),
        };

        let entry = match notice.item_at(index) {
            Some(entry) => entry.clone(),
            None => {
                return Ok(format!(
                    "Please enter a valid item number between 1 and {}",
                    notice.items().len()
                ));
            }
        };

        let item = match self.resolve_item(&notice, index, entry.library_item_id).await? {
            Some(item) => item,
            None => {
                return Ok(format!(
                    "\"{}\" is no longer available. It may have been removed from your library.",
                    entry.title
                ));
            }
        };

        let now = Utc::now();
        match command {
            NoticeCommand::Renew => {
                let new_expiry = library_item::expiry_from(now);
                let applied = self
                    .notices
                    .apply_renewal(notice.id, index - 1, item.id, now, new_expiry)
                    .await?;

                if applied {
                    tracing::info!(
                        notice_id = %notice.id,
                        library_item_id = %item.id,
                        new_expiry = %new_expiry,
                        "Library item renewed by SMS"
                    );
                    Ok(format!(
                        "Successfully renewed \"{}\". New expiry date: {}",
                        item.title,
                        format_expiry_date(new_expiry)
                    ))
                } else {
                    Ok(already_handled_reply(&item.title))
                }
            }
            NoticeCommand::Delete => {
                let forced_expiry = now - Duration::minutes(1);
                let applied = self
                    .notices
                    .apply_deletion(notice.id, index - 1, item.id, now, forced_expiry)
                    .await?;

                if applied {
                    tracing::info!(
                        notice_id = %notice.id,
                        library_item_id = %item.id,
                        "Library item force-expired by SMS"
                    );
                    Ok(format!(
                        "\"{}\" has been removed from your library.",
                        item.title
                    ))
                } else {
                    Ok(already_handled_reply(&item.title))
                }
            }
        }
    }

    /// Resolve a notice entry to its library item. An unresolvable entry is
    /// marked unavailable on the notice so the failure is visible later.
    async fn resolve_item(
        &self,
        notice: &ExpiryNoticeEntity,
        index: usize,
        item_id: uuid::Uuid,
    ) -> Result<Option<LibraryItemEntity>, sqlx::Error> {
        if let Some(item) = self.library.find_by_id(item_id).await? {
            return Ok(Some(item));
        }

        tracing::warn!(
            notice_id = %notice.id,
            library_item_id = %item_id,
            "Notice entry no longer resolves to a library item"
        );
        self.notices
            .mark_item_unavailable(
                notice.id,
                index - 1,
                item_id,
                "Library item not found",
                Utc::now(),
            )
            .await?;
        Ok(None)
    }
}

fn already_handled_reply(title: &str) -> String {
    format!("\"{}\" has already been renewed or removed.", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_expiry_date_no_zero_padding() {
        let date = Utc.with_ymd_and_hms(2026, 9, 6, 12, 0, 0).unwrap();
        assert_eq!(format_expiry_date(date), "9/6/2026");
    }

    #[test]
    fn test_format_expiry_date_double_digits() {
        let date = Utc.with_ymd_and_hms(2026, 11, 23, 0, 0, 0).unwrap();
        assert_eq!(format_expiry_date(date), "11/23/2026");
    }

    #[test]
    fn test_usage_replies_name_the_command() {
        assert_eq!(
            NoticeCommand::Renew.usage_reply(),
            "Please specify a valid item number (e.g., RENEW 1)"
        );
        assert_eq!(
            NoticeCommand::Delete.usage_reply(),
            "Please specify a valid item number (e.g., DELETE 1)"
        );
    }

    #[test]
    fn test_no_notice_reply_names_the_verb() {
        assert!(NoticeCommand::Renew.no_notice_reply().ends_with("attempting to renew."));
        assert!(NoticeCommand::Delete.no_notice_reply().ends_with("attempting to delete."));
    }
}
