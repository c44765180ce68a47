//! Twilio-backed SMS sender.

use async_trait::async_trait;
use domain::services::{SmsResult, SmsSender};

use crate::config::TwilioConfig;
use crate::middleware::record_outbound_sms;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// SMS sender implementation backed by the Twilio Messages API.
pub struct TwilioSmsSender {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSmsSender {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> SmsResult {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.account_sid
        );

        let result = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(to = %to, "SMS sent");
                record_outbound_sms("sent");
                SmsResult::Sent
            }
            Ok(response) => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                tracing::warn!(to = %to, status = %status, detail = %detail, "SMS send rejected");
                record_outbound_sms("failed");
                SmsResult::Failed(format!("Twilio returned status {}", status))
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "SMS send failed");
                record_outbound_sms("failed");
                SmsResult::Failed(e.to_string())
            }
        }
    }
}
