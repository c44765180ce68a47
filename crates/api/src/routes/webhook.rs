//! Twilio inbound SMS webhook.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;

use crate::app::AppState;
use crate::services::search::GENERIC_ERROR_REPLY;
use crate::services::ConversationService;
use crate::twiml::Twiml;

/// Twilio webhook form payload. Field names are Twilio's.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
}

/// Handle an inbound SMS and reply with TwiML.
///
/// Failures still reply with TwiML so Twilio relays something to the sender
/// instead of its own error message.
pub async fn inbound_sms(
    State(state): State<AppState>,
    Form(payload): Form<InboundSms>,
) -> Response {
    let conversation =
        ConversationService::new(state.pool.clone(), state.catalog.clone(), state.sms.clone());

    match conversation.handle(&payload.from, &payload.body).await {
        Ok(twiml) => twiml.into_response_with_status(StatusCode::OK),
        Err(e) => {
            tracing::error!(from = %payload.from, error = %e, "Webhook handling failed");
            Twiml::message(GENERIC_ERROR_REPLY)
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
