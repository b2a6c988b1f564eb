use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dashboard::loader::load_pipeline;
use crate::dashboard::view::DashboardView;
use crate::dashboard::Action;
use crate::errors::AppError;
use crate::models::interview::AvailabilityWindow;
use crate::models::pipeline::CandidateDetail;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ActionResponse {
    pub status: Option<String>,
    pub view: DashboardView,
}

#[derive(Deserialize, Default)]
pub struct ReloadRequest {
    #[serde(default)]
    pub role_id: Option<i64>,
}

#[derive(Serialize)]
pub struct CandidateResponse {
    pub display_name: String,
    #[serde(flatten)]
    pub detail: CandidateDetail,
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub slot_id: String,
    pub status: String,
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.render())
}

/// POST /api/v1/dashboard/actions
pub async fn handle_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let status = dashboard.handle(action, Utc::now())?;
    Ok(Json(ActionResponse {
        status,
        view: dashboard.render(),
    }))
}

/// POST /api/v1/dashboard/reload
/// Fetches outside the session lock, then swaps the data in.
pub async fn handle_reload(
    State(state): State<AppState>,
    body: Option<Json<ReloadRequest>>,
) -> Json<ActionResponse> {
    let role_id = body.and_then(|Json(req)| req.role_id);
    let data = load_pipeline(state.backend.as_ref(), &state.mock, role_id).await;

    let mut dashboard = state.dashboard.lock().await;
    dashboard.replace_data(data);
    Json(ActionResponse {
        status: Some("Refreshed.".to_string()),
        view: dashboard.render(),
    })
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<CandidateResponse>, AppError> {
    let detail = state.backend.fetch_candidate(&candidate_id).await?;
    Ok(Json(CandidateResponse {
        display_name: detail.display_name(),
        detail,
    }))
}

/// POST /api/v1/availability/:slot_id/publish
/// Sends a local slot to the backend as `"{day} {HH:MM}"` start/end strings.
pub async fn handle_publish_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<PublishResponse>, AppError> {
    let slot = {
        let dashboard = state.dashboard.lock().await;
        dashboard
            .availability()
            .get(&slot_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Availability slot '{slot_id}' not found.")))?
    };

    state
        .backend
        .add_availability(&AvailabilityWindow {
            start_time: format!("{} {}", slot.day, slot.start),
            end_time: format!("{} {}", slot.day, slot.end),
        })
        .await?;
    info!("Published availability {} ({})", slot.label(), slot.id);

    Ok(Json(PublishResponse {
        slot_id: slot.id,
        status: "Availability added".to_string(),
    }))
}
