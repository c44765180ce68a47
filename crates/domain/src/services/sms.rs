//! Outbound SMS abstraction.
//!
//! Sends are fire-and-forget: a failure is reported to the caller but never
//! rolls back the store mutation that preceded it.

use std::sync::Mutex;

/// Result of an SMS send attempt.
#[derive(Debug, Clone)]
pub enum SmsResult {
    /// Message was accepted by the provider.
    Sent,
    /// Sending failed (non-blocking for the caller).
    Failed(String),
    /// Sending was skipped (e.g., provider disabled in config).
    Skipped,
}

impl SmsResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, SmsResult::Sent)
    }
}

/// SMS delivery collaborator.
#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    /// Send `body` to the E.164 number `to`. No delivery guarantee.
    async fn send(&self, to: &str, body: &str) -> SmsResult;
}

/// Mock SMS sender for development and testing.
///
/// Records every message so tests can assert on outbound traffic.
#[derive(Debug, Default)]
pub struct MockSmsSender {
    pub simulate_failure: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSmsSender {
    /// Create a new mock SMS sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock sender that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent so far, as (to, body) pairs.
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sms mock lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl SmsSender for MockSmsSender {
    async fn send(&self, to: &str, body: &str) -> SmsResult {
        if self.simulate_failure {
            tracing::warn!(to = %to, "Mock SMS sender simulating failure");
            return SmsResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(to = %to, body_len = body.len(), "Mock: Would send SMS");
        self.sent
            .lock()
            .expect("sms mock lock poisoned")
            .push((to.to_string(), body.to_string()));

        SmsResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sms_sender_records_messages() {
        let sender = MockSmsSender::new();
        let result = sender.send("+15551234567", "hello").await;
        assert!(result.is_sent());

        let sent = sender.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15551234567");
        assert_eq!(sent[0].1, "hello");
    }

    #[tokio::test]
    async fn test_mock_sms_sender_failure() {
        let sender = MockSmsSender::failing();
        let result = sender.send("+15551234567", "hello").await;
        assert!(matches!(result, SmsResult::Failed(_)));
        assert!(sender.sent_messages().is_empty());
    }
}
