pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::form::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/sessions/:id/personal",
            patch(handlers::handle_set_personal),
        )
        .route(
            "/api/v1/sessions/:id/personal/show-photo",
            put(handlers::handle_set_show_photo),
        )
        // Entry registry
        .route(
            "/api/v1/sessions/:id/sections/:kind/entries",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/sections/:kind/entries/:entry_id",
            patch(handlers::handle_edit_field).delete(handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/sessions/:id/sections/:kind/entries/:entry_id/move-up",
            post(handlers::handle_move_up),
        )
        .route(
            "/api/v1/sessions/:id/sections/:kind/entries/:entry_id/move-down",
            post(handlers::handle_move_down),
        )
        .route(
            "/api/v1/sessions/:id/sections/:kind/entries/:entry_id/visibility",
            post(handlers::handle_toggle_visibility),
        )
        // Assembled views
        .route(
            "/api/v1/sessions/:id/document",
            get(handlers::handle_document),
        )
        .route("/api/v1/sessions/:id/preview", get(handlers::handle_preview))
        .route("/api/v1/sessions/:id/payload", get(handlers::handle_payload))
        // Saved resumes
        .route("/api/v1/sessions/:id/save", post(handlers::handle_save))
        .route("/api/v1/resumes", get(handlers::handle_list_resumes))
        .route(
            "/api/v1/resumes/:resume_id",
            get(handlers::handle_get_resume),
        )
        .with_state(state)
}
