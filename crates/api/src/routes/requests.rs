//! Dashboard request decision endpoint.

use axum::extract::State;
use axum::Json;
use domain::models::media_request::RequestActionBody;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::approval::ActionSummary;
use crate::services::ApprovalService;

/// POST /api/requests/action
pub async fn request_action(
    State(state): State<AppState>,
    Json(payload): Json<RequestActionBody>,
) -> Result<Json<ActionSummary>, ApiError> {
    let service = ApprovalService::new(state.pool.clone(), state.sms.clone());
    let summary = service.decide(&payload).await?;
    Ok(Json(summary))
}
