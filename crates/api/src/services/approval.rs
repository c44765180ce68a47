//! Manager decisions on media requests and the promotion into the library.

use std::sync::Arc;

use chrono::Utc;
use domain::models::media_request::{RequestAction, RequestActionBody};
use domain::services::SmsSender;
use persistence::repositories::{MediaRequestRepository, PromotionResult, RejectionResult};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Outcome of a decision call, returned to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub success: bool,
    pub approved: usize,
    pub rejected: usize,
    pub already_decided: usize,
    pub sms_sent: usize,
}

pub fn approval_message(title: &str) -> String {
    format!(
        "Your request for \"{}\" has been approved! It will be added to the library soon.",
        title
    )
}

pub fn rejection_message(title: &str) -> String {
    format!(
        "Your request for \"{}\" has been declined. Please contact your media server administrator for more information.",
        title
    )
}

/// Consolidated approval SMS for one requester's batch.
pub fn batch_approval_message(titles: &[String]) -> String {
    match titles {
        [only] => format!(
            "Your request for \"{}\" has been approved! It will be added to the library soon.",
            only
        ),
        [first, second] => format!(
            "Your requests for \"{}\" and \"{}\" have been approved! They will be added to the library soon.",
            first, second
        ),
        _ => {
            let (last, rest) = match titles.split_last() {
                Some(split) => split,
                None => return String::new(),
            };
            format!(
                "Your requests for \"{}\", and \"{}\" have been approved! They will be added to the library soon.",
                rest.join("\", \""),
                last
            )
        }
    }
}

/// Applies approve/reject decisions and notifies requesters.
pub struct ApprovalService {
    requests: MediaRequestRepository,
    sms: Arc<dyn SmsSender>,
}

impl ApprovalService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            requests: MediaRequestRepository::new(pool),
            sms,
        }
    }

    /// Dispatch a dashboard action body to the single or batch path.
    pub async fn decide(&self, body: &RequestActionBody) -> Result<ActionSummary, ApiError> {
        if body.is_batch_approval {
            if body.request_ids.is_empty() {
                return Err(ApiError::Validation(
                    "requestIds must not be empty for a batch approval".to_string(),
                ));
            }
            return self.batch_approve(&body.request_ids).await;
        }

        let request_id = body
            .request_id
            .ok_or_else(|| ApiError::Validation("requestId is required".to_string()))?;
        let action = body
            .action
            .ok_or_else(|| ApiError::Validation("action is required".to_string()))?;

        match action {
            RequestAction::Approved => self.approve(request_id).await,
            RequestAction::Rejected => self.reject(request_id).await,
        }
    }

    /// Approve one request. Re-approving an already-decided request succeeds
    /// without promoting or notifying again.
    async fn approve(&self, request_id: Uuid) -> Result<ActionSummary, ApiError> {
        match self.requests.approve_and_promote(request_id, Utc::now()).await? {
            PromotionResult::Promoted { request, item } => {
                tracing::info!(
                    request_id = %request.id,
                    library_item_id = %item.id,
                    expires_at = %item.expires_at,
                    "Request approved and promoted"
                );
                let sms_sent = self
                    .sms
                    .send(&request.requester_phone, &approval_message(&request.title))
                    .await
                    .is_sent();
                Ok(ActionSummary {
                    success: true,
                    approved: 1,
                    rejected: 0,
                    already_decided: 0,
                    sms_sent: usize::from(sms_sent),
                })
            }
            PromotionResult::AlreadyDecided(request) => {
                tracing::info!(request_id = %request.id, status = ?request.status, "Request already decided");
                Ok(ActionSummary {
                    success: true,
                    approved: 0,
                    rejected: 0,
                    already_decided: 1,
                    sms_sent: 0,
                })
            }
            PromotionResult::NotFound => {
                Err(ApiError::NotFound("Request not found".to_string()))
            }
        }
    }

    async fn reject(&self, request_id: Uuid) -> Result<ActionSummary, ApiError> {
        match self.requests.reject(request_id, Utc::now()).await? {
            RejectionResult::Rejected(request) => {
                tracing::info!(request_id = %request.id, "Request rejected");
                let sms_sent = self
                    .sms
                    .send(&request.requester_phone, &rejection_message(&request.title))
                    .await
                    .is_sent();
                Ok(ActionSummary {
                    success: true,
                    approved: 0,
                    rejected: 1,
                    already_decided: 0,
                    sms_sent: usize::from(sms_sent),
                })
            }
            RejectionResult::AlreadyDecided(request) => {
                tracing::info!(request_id = %request.id, status = ?request.status, "Request already decided");
                Ok(ActionSummary {
                    success: true,
                    approved: 0,
                    rejected: 0,
                    already_decided: 1,
                    sms_sent: 0,
                })
            }
            RejectionResult::NotFound => {
                Err(ApiError::NotFound("Request not found".to_string()))
            }
        }
    }

    /// Approve a batch, then send one consolidated SMS per requester.
    ///
    /// Missing or already-decided requests are skipped, not errors; the batch
    /// reports what it actually promoted.
    async fn batch_approve(&self, request_ids: &[Uuid]) -> Result<ActionSummary, ApiError> {
        let now = Utc::now();
        let mut approved = 0;
        let mut already_decided = 0;
        // Insertion-ordered grouping so SMS order follows the batch order
        let mut titles_by_phone: Vec<(String, Vec<String>)> = Vec::new();

        for &request_id in request_ids {
            match self.requests.approve_and_promote(request_id, now).await? {
                PromotionResult::Promoted { request, .. } => {
                    approved += 1;
                    match titles_by_phone
                        .iter_mut()
                        .find(|(phone, _)| *phone == request.requester_phone)
                    {
                        Some((_, titles)) => titles.push(request.title),
                        None => {
                            titles_by_phone.push((request.requester_phone, vec![request.title]));
                        }
                    }
                }
                PromotionResult::AlreadyDecided(request) => {
                    tracing::info!(request_id = %request.id, "Batch approval skipped decided request");
                    already_decided += 1;
                }
                PromotionResult::NotFound => {
                    tracing::warn!(request_id = %request_id, "Batch approval skipped missing request");
                }
            }
        }

        let mut sms_sent = 0;
        for (phone, titles) in &titles_by_phone {
            if self
                .sms
                .send(phone, &batch_approval_message(titles))
                .await
                .is_sent()
            {
                sms_sent += 1;
            }
        }

        tracing::info!(
            approved = approved,
            already_decided = already_decided,
            requesters_notified = sms_sent,
            "Batch approval completed"
        );

        Ok(ActionSummary {
            success: true,
            approved,
            rejected: 0,
            already_decided,
            sms_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_batch_message_single_title() {
        assert_eq!(
            batch_approval_message(&titles(&["Inception"])),
            "Your request for \"Inception\" has been approved! It will be added to the library soon."
        );
    }

    #[test]
    fn test_batch_message_two_titles() {
        assert_eq!(
            batch_approval_message(&titles(&["Inception", "Dune"])),
            "Your requests for \"Inception\" and \"Dune\" have been approved! They will be added to the library soon."
        );
    }

    #[test]
    fn test_batch_message_three_titles_oxford_comma() {
        assert_eq!(
            batch_approval_message(&titles(&["Inception", "Dune", "Heat"])),
            "Your requests for \"Inception\", \"Dune\", and \"Heat\" have been approved! They will be added to the library soon."
        );
    }

    #[test]
    fn test_single_decision_messages() {
        assert_eq!(
            approval_message("Dune"),
            "Your request for \"Dune\" has been approved! It will be added to the library soon."
        );
        assert!(rejection_message("Dune").contains("has been declined"));
    }
}
