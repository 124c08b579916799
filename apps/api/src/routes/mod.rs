pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::parser::handlers as parser;
use crate::state::AppState;
use crate::uploads::handlers as uploads;
use crate::wizard::handlers as wizard;

// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes as usize + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard
        .route(
            "/api/v1/applications/:session",
            get(wizard::handle_get_application).delete(wizard::handle_clear_application),
        )
        .route(
            "/api/v1/applications/:session/steps",
            get(wizard::handle_get_steps),
        )
        .route(
            "/api/v1/applications/:session/fields",
            patch(wizard::handle_edit_fields),
        )
        .route(
            "/api/v1/applications/:session/advance",
            post(wizard::handle_advance),
        )
        .route(
            "/api/v1/applications/:session/back",
            post(wizard::handle_back),
        )
        .route(
            "/api/v1/applications/:session/goto",
            post(wizard::handle_go_to_step),
        )
        .route(
            "/api/v1/applications/:session/submit",
            post(wizard::handle_submit),
        )
        // List editors
        .route(
            "/api/v1/applications/:session/skills",
            post(wizard::handle_commit_skill),
        )
        .route(
            "/api/v1/applications/:session/skills/:index",
            delete(wizard::handle_remove_skill),
        )
        .route(
            "/api/v1/applications/:session/education",
            post(wizard::handle_commit_education),
        )
        .route(
            "/api/v1/applications/:session/education/:index",
            delete(wizard::handle_remove_education),
        )
        .route(
            "/api/v1/applications/:session/education/order",
            put(wizard::handle_reorder_education),
        )
        .route(
            "/api/v1/applications/:session/education/move",
            post(wizard::handle_move_education),
        )
        // Resume
        .route(
            "/api/v1/applications/:session/resume",
            post(uploads::handle_upload_resume)
                .delete(uploads::handle_clear_resume)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/applications/:session/resume/progress",
            get(uploads::handle_upload_progress),
        )
        .route(
            "/api/v1/resume/parse",
            post(parser::handle_parse_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
