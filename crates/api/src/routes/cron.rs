//! Scheduler-triggered endpoints, guarded by the shared cron secret.

use axum::extract::State;
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::expiry_scan::ScanSummary;
use crate::services::pending_reminder::ReminderSummary;
use crate::services::{ExpiryScanService, PendingReminderService};

/// The auth check runs before any database work so a bad token never
/// touches state.
fn require_cron_secret(
    state: &AppState,
    auth: Option<&TypedHeader<Authorization<Bearer>>>,
) -> Result<(), ApiError> {
    match auth {
        Some(TypedHeader(auth)) if auth.token() == state.config.cron.secret => Ok(()),
        _ => Err(ApiError::Unauthorized("Invalid cron secret".to_string())),
    }
}

/// GET /api/cron/check-library-expiry
pub async fn check_library_expiry(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ScanSummary>, ApiError> {
    require_cron_secret(&state, auth.as_ref())?;

    let service = ExpiryScanService::new(state.pool.clone(), state.sms.clone());
    let summary = service.run().await?;
    Ok(Json(summary))
}

/// GET /api/cron/notify-pending-requests
pub async fn notify_pending_requests(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ReminderSummary>, ApiError> {
    require_cron_secret(&state, auth.as_ref())?;

    let service = PendingReminderService::new(state.pool.clone(), state.sms.clone());
    let summary = service.run().await?;
    Ok(Json(summary))
}
