//! Manager invitation endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domain::models::invitation::{CreateInvitationRequest, CreateInvitationResponse};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::RegistrationService;

/// POST /api/invites
pub async fn create_invitation(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<CreateInvitationResponse>), ApiError> {
    payload.validate()?;

    let service = RegistrationService::new(state.pool.clone(), state.sms.clone());
    let response = service.invite(&payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
