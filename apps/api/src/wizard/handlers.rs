//! Axum route handlers for the application wizard.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{FieldEdit, Submission};
use crate::state::AppState;
use crate::wizard::controller::{StepOutcome, WizardController};
use crate::wizard::service;
use crate::wizard::steps::{indicator, StepIndicator};
use crate::wizard::view::{StepResponse, WizardView};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoToStepRequest {
    pub step: u8,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<Uuid>,
}

/// End of a drag gesture. `over` is absent when the item was dropped outside
/// any valid target.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub active: Uuid,
    pub over: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    /// Identity token of the new entry; `None` when the staging entry was incomplete.
    pub committed: Option<Uuid>,
    pub view: WizardView,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub moved: bool,
    pub view: WizardView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications/:session
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    let controller = service::load(&state.drafts, session).await?;
    Ok(Json(WizardView::new(session, &controller)))
}

/// DELETE /api/v1/applications/:session
pub async fn handle_clear_application(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.drafts.clear(session).await?;
    state.progress.forget(session);
    info!("Cleared draft for session {session}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications/:session/steps
pub async fn handle_get_steps(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<Vec<StepIndicator>>, AppError> {
    let controller = service::load(&state.drafts, session).await?;
    Ok(Json(indicator(controller.step())))
}

/// PATCH /api/v1/applications/:session/fields
pub async fn handle_edit_fields(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
    Json(edit): Json<FieldEdit>,
) -> Result<Json<WizardView>, AppError> {
    let (controller, ()) = service::edit(&state.drafts, session, |c| {
        c.edit(edit);
        Ok(())
    })
    .await?;
    Ok(Json(WizardView::new(session, &controller)))
}

/// POST /api/v1/applications/:session/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<StepResponse>, AppError> {
    let (controller, outcome) =
        service::mutate(&state.drafts, session, |c| Ok(c.advance())).await?;
    finish_navigation(&state, session, controller, outcome).await
}

/// POST /api/v1/applications/:session/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<StepResponse>, AppError> {
    let (controller, outcome) = service::mutate(&state.drafts, session, |c| Ok(c.back())).await?;
    Ok(Json(StepResponse::new(session, &controller, outcome)))
}

/// POST /api/v1/applications/:session/goto
pub async fn handle_go_to_step(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
    Json(req): Json<GoToStepRequest>,
) -> Result<Json<StepResponse>, AppError> {
    let (controller, outcome) =
        service::mutate(&state.drafts, session, |c| Ok(c.go_to_step(req.step)?)).await?;
    finish_navigation(&state, session, controller, outcome).await
}

/// POST /api/v1/applications/:session/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<StepResponse>, AppError> {
    let (controller, outcome) =
        service::mutate(&state.drafts, session, |c| Ok(c.submit_final()?)).await?;
    finish_navigation(&state, session, controller, outcome).await
}

/// POST /api/v1/applications/:session/skills
pub async fn handle_commit_skill(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<CommitResponse>, AppError> {
    let (controller, committed) =
        service::edit(&state.drafts, session, |c| Ok(c.commit_skill())).await?;
    Ok(Json(CommitResponse {
        committed,
        view: WizardView::new(session, &controller),
    }))
}

/// DELETE /api/v1/applications/:session/skills/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((session, index)): Path<(Uuid, usize)>,
) -> Result<Json<WizardView>, AppError> {
    let (controller, ()) =
        service::edit(&state.drafts, session, |c| Ok(c.remove_skill(index)?)).await?;
    Ok(Json(WizardView::new(session, &controller)))
}

/// POST /api/v1/applications/:session/education
pub async fn handle_commit_education(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<CommitResponse>, AppError> {
    let (controller, committed) =
        service::edit(&state.drafts, session, |c| Ok(c.commit_education())).await?;
    Ok(Json(CommitResponse {
        committed,
        view: WizardView::new(session, &controller),
    }))
}

/// DELETE /api/v1/applications/:session/education/:index
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path((session, index)): Path<(Uuid, usize)>,
) -> Result<Json<WizardView>, AppError> {
    let (controller, ()) =
        service::edit(&state.drafts, session, |c| Ok(c.remove_education(index)?)).await?;
    Ok(Json(WizardView::new(session, &controller)))
}

/// PUT /api/v1/applications/:session/education/order
pub async fn handle_reorder_education(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<WizardView>, AppError> {
    let (controller, ()) = service::edit(&state.drafts, session, |c| {
        Ok(c.reorder_education(&req.order)?)
    })
    .await?;
    Ok(Json(WizardView::new(session, &controller)))
}

/// POST /api/v1/applications/:session/education/move
pub async fn handle_move_education(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let (controller, moved) = service::edit(&state.drafts, session, |c| {
        Ok(c.move_education(req.active, req.over))
    })
    .await?;
    Ok(Json(MoveResponse {
        moved,
        view: WizardView::new(session, &controller),
    }))
}

/// Hands the record to the submission sink when a navigation completed the
/// wizard. Sink failures are logged and never reach the applicant.
async fn finish_navigation(
    state: &AppState,
    session: Uuid,
    controller: WizardController,
    outcome: StepOutcome,
) -> Result<Json<StepResponse>, AppError> {
    if outcome.completed() {
        let submission = Submission::from(controller.record());
        if let Err(e) = state.submissions.submit(session, &submission).await {
            error!("Submission hand-off failed for session {session}: {e:?}");
        }
    }
    Ok(Json(StepResponse::new(session, &controller, outcome)))
}
