//! Manager-initiated user removal.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use domain::models::media_request::CancellationReason;
use domain::models::notification::NotificationType;
use domain::models::user::RemoveUserRequest;
use domain::models::UserStatus;
use persistence::repositories::UserRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

const REMOVAL_NOTICE: &str = "You have been removed from your StreamRequest group. If you believe this was a mistake, please contact the administrator.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserSummary {
    pub success: bool,
    pub user_id: Uuid,
    pub requests_cancelled: u64,
    pub invitations_cancelled: u64,
    pub sms_sent: bool,
}

/// POST /api/users/remove
pub async fn remove_user(
    State(state): State<AppState>,
    Json(payload): Json<RemoveUserRequest>,
) -> Result<Json<RemoveUserSummary>, ApiError> {
    let users = UserRepository::new(state.pool.clone());

    let user = users
        .find_by_id(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.status != UserStatus::Active {
        return Err(ApiError::Conflict("User is not active".to_string()));
    }

    let outcome = users
        .deactivate_cascade(
            &user,
            UserStatus::Inactive,
            CancellationReason::RemovedByManager,
            NotificationType::UserRemoved,
            Utc::now(),
        )
        .await?;

    tracing::info!(
        user_id = %user.id,
        requests_cancelled = outcome.requests_cancelled,
        invitations_cancelled = outcome.invitations_cancelled,
        "User removed by manager"
    );

    let sms_sent = state
        .sms
        .send(&user.phone_number, REMOVAL_NOTICE)
        .await
        .is_sent();

    Ok(Json(RemoveUserSummary {
        success: true,
        user_id: user.id,
        requests_cancelled: outcome.requests_cancelled,
        invitations_cancelled: outcome.invitations_cancelled,
        sms_sent,
    }))
}
