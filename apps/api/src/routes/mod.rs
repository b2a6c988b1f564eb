pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers as dashboard;
use crate::feedback::handlers as feedback;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Dashboard session
        .route("/api/v1/dashboard", get(dashboard::handle_get_dashboard))
        .route("/api/v1/dashboard/actions", post(dashboard::handle_action))
        .route("/api/v1/dashboard/reload", post(dashboard::handle_reload))
        .route(
            "/api/v1/candidates/:id",
            get(dashboard::handle_get_candidate),
        )
        .route(
            "/api/v1/availability/:slot_id/publish",
            post(dashboard::handle_publish_slot),
        )
        // Roles and interview feedback
        .route(
            "/api/v1/roles",
            get(feedback::handle_list_roles).post(feedback::handle_create_role),
        )
        .route("/api/v1/feedback", post(feedback::handle_submit_feedback))
        .route(
            "/api/v1/feedback/draft",
            get(feedback::handle_get_draft)
                .put(feedback::handle_save_draft)
                .delete(feedback::handle_clear_draft),
        )
        .route("/api/v1/feedback/saved", get(feedback::handle_get_saved))
        .with_state(state)
}
