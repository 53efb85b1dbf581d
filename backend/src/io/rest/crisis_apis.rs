//! # REST API for Crisis Mode
//!
//! Static calming content and the per-user crisis-mode session.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use shared::api::{CrisisModeStatus, CrisisResourcesResponse, DeleteResponse, FinishCrisisRequest, ToggleTriggerRequest};
use shared::crisis::{CALMING_TECHNIQUES, CRISIS_STRATEGIES, TRIGGER_CHECKLIST};
use shared::CrisisRecord;
use tracing::info;

use crate::domain::{AppError, CrisisModeService};
use crate::io::rest::session::CurrentUser;

pub async fn crisis_resources() -> Json<CrisisResourcesResponse> {
    Json(CrisisResourcesResponse {
        techniques: CALMING_TECHNIQUES,
        strategies: CRISIS_STRATEGIES,
        trigger_checklist: TRIGGER_CHECKLIST,
    })
}

/// Opens crisis mode or reports the one already open
pub async fn start_crisis_mode(
    State(crisis): State<CrisisModeService>,
    CurrentUser(user_id): CurrentUser,
) -> Json<CrisisModeStatus> {
    info!("POST /api/crisis/session");
    Json(crisis.start(&user_id).await)
}

pub async fn crisis_mode_status(
    State(crisis): State<CrisisModeService>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<CrisisModeStatus>, AppError> {
    Ok(Json(crisis.status(&user_id).await?))
}

pub async fn toggle_crisis_trigger(
    State(crisis): State<CrisisModeService>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ToggleTriggerRequest>,
) -> Result<Json<CrisisModeStatus>, AppError> {
    info!("POST /api/crisis/session/triggers - trigger: {}", request.trigger);
    Ok(Json(crisis.toggle_trigger(&user_id, &request.trigger).await?))
}

pub async fn finish_crisis_mode(
    State(crisis): State<CrisisModeService>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<FinishCrisisRequest>,
) -> Result<(StatusCode, Json<CrisisRecord>), AppError> {
    info!("POST /api/crisis/session/finish");
    let today = Utc::now().date_naive();
    let record = crisis.finish(&user_id, request, today).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn cancel_crisis_mode(
    State(crisis): State<CrisisModeService>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DeleteResponse>, AppError> {
    info!("DELETE /api/crisis/session");
    if !crisis.cancel(&user_id).await {
        return Err(AppError::not_found("crisis_mode", &user_id));
    }
    Ok(Json(DeleteResponse {
        id: user_id,
        success_message: "Crisis mode closed".to_string(),
    }))
}
