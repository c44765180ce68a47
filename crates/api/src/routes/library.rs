//! Dashboard library maintenance endpoints.

use axum::extract::State;
use axum::Json;
use domain::models::library_item::{RemoveLibraryItemRequest, RenewLibraryItemRequest};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::library_admin::LibraryActionSummary;
use crate::services::LibraryAdminService;

/// POST /api/library/renew
pub async fn renew_item(
    State(state): State<AppState>,
    Json(payload): Json<RenewLibraryItemRequest>,
) -> Result<Json<LibraryActionSummary>, ApiError> {
    payload.validate()?;

    let service = LibraryAdminService::new(state.pool.clone(), state.sms.clone());
    let summary = service.renew(&payload).await?;
    Ok(Json(summary))
}

/// POST /api/library/remove
pub async fn remove_item(
    State(state): State<AppState>,
    Json(payload): Json<RemoveLibraryItemRequest>,
) -> Result<Json<LibraryActionSummary>, ApiError> {
    payload.validate()?;

    let service = LibraryAdminService::new(state.pool.clone(), state.sms.clone());
    let summary = service.remove(&payload).await?;
    Ok(Json(summary))
}
