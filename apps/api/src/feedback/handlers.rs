use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::feedback::roles::{create_role, RoleCreated, RoleForm};
use crate::feedback::{
    clear_draft, load_draft, load_saved, save_draft, submit_feedback, FeedbackDraft, FeedbackForm,
    FeedbackReceipt, SavedPreview,
};
use crate::models::role::RoleSummary;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedbackKeyQuery {
    pub candidate_id: i64,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct DraftResponse {
    pub draft: Option<FeedbackDraft>,
}

#[derive(Serialize)]
pub struct SavedResponse {
    pub saved: Option<SavedPreview>,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleSummary>>, AppError> {
    Ok(Json(state.backend.list_roles().await?))
}

/// POST /api/v1/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    Json(form): Json<RoleForm>,
) -> Result<Json<RoleCreated>, AppError> {
    Ok(Json(create_role(state.backend.as_ref(), &form).await?))
}

/// POST /api/v1/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<FeedbackReceipt>, AppError> {
    let receipt = submit_feedback(state.backend.as_ref(), &state.local_store, &form).await?;
    Ok(Json(receipt))
}

/// GET /api/v1/feedback/draft
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Query(params): Query<FeedbackKeyQuery>,
) -> Json<DraftResponse> {
    Json(DraftResponse {
        draft: load_draft(&state.local_store, params.candidate_id, params.role.as_deref()),
    })
}

/// PUT /api/v1/feedback/draft
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = save_draft(&state.local_store, &form).await?;
    Ok(Json(DraftResponse { draft: Some(draft) }))
}

/// DELETE /api/v1/feedback/draft
pub async fn handle_clear_draft(
    State(state): State<AppState>,
    Query(params): Query<FeedbackKeyQuery>,
) -> Result<Json<DraftResponse>, AppError> {
    clear_draft(&state.local_store, params.candidate_id, params.role.as_deref()).await?;
    Ok(Json(DraftResponse { draft: None }))
}

/// GET /api/v1/feedback/saved
pub async fn handle_get_saved(
    State(state): State<AppState>,
    Query(params): Query<FeedbackKeyQuery>,
) -> Json<SavedResponse> {
    let saved = load_saved(&state.local_store, params.candidate_id, params.role.as_deref());
    Json(SavedResponse {
        saved: saved.as_ref().map(SavedPreview::from),
    })
}
