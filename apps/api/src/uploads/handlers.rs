//! Axum route handlers for the resume upload.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::{header::CONTENT_LENGTH, HeaderMap},
    Json,
};
use bytes::BytesMut;
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::progress::ProgressReporter;
use crate::uploads::{ResumeFile, UploadCompletion, UploadError, UploadStatus};
use crate::wizard::controller::WizardController;
use crate::wizard::service;
use crate::wizard::validation::PDF_CONTENT_TYPE;
use crate::wizard::view::WizardView;

const FILE_FIELD: &str = "file";
const UPLOAD_FAILED_MESSAGE: &str = "Upload failed, please try again";

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: u8,
    pub upload: UploadStatus,
}

/// POST /api/v1/applications/:session/resume
///
/// Multipart body with a single PDF in the `file` field. The newest upload of
/// a session wins; a superseded upload finishes silently without touching the
/// record. Transport failures land in the view as a failed upload state.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<WizardView>, AppError> {
    let total_bytes = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let mut field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
        {
            Some(field) if field.name() == Some(FILE_FIELD) => break field,
            Some(_) => continue,
            None => return Err(AppError::Validation("Resume is required".to_string())),
        }
    };

    let name = field
        .file_name()
        .filter(|n| !n.is_empty())
        .unwrap_or("resume.pdf")
        .to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    if content_type != PDF_CONTENT_TYPE {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }

    let file_name = name.clone();
    let (_, ticket) =
        service::edit(&state.drafts, session, |c| Ok(c.begin_upload(file_name))).await?;

    let mut reporter = state.progress.start(session, ticket, total_bytes);
    let read = read_field(&mut field, &mut reporter, state.config.max_upload_bytes).await;
    let result = match read {
        Ok(bytes) => {
            debug!("Received {} bytes of upload {ticket}", reporter.sent());
            let file = ResumeFile {
                name,
                content_type,
                bytes,
            };
            state.uploads.upload(session, ticket, &file).await
        }
        Err(e) => Err(e),
    };
    if result.is_ok() {
        reporter.done();
    }

    let outcome = settle_upload(&state, session, ticket, result).await;
    state.progress.finish(session, ticket);
    let controller = outcome?;

    Ok(Json(WizardView::new(session, &controller)))
}

/// GET /api/v1/applications/:session/resume/progress
pub async fn handle_upload_progress(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<ProgressResponse>, AppError> {
    let controller = service::load(&state.drafts, session).await?;
    let progress = state
        .progress
        .current(session)
        .unwrap_or(controller.progress());
    Ok(Json(ProgressResponse {
        progress,
        upload: controller.upload().clone(),
    }))
}

/// DELETE /api/v1/applications/:session/resume
///
/// Resets progress and drops the reference and metadata, including the
/// resume-meta key. An upload still in flight is not aborted; its completion
/// is discarded.
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Path(session): Path<Uuid>,
) -> Result<Json<WizardView>, AppError> {
    let (controller, ()) = service::edit(&state.drafts, session, |c| {
        c.clear_resume();
        Ok(())
    })
    .await?;
    state.progress.forget(session);
    Ok(Json(WizardView::new(session, &controller)))
}

/// Records the transfer result on the wizard. A superseded or cleared upload
/// leaves the record alone.
async fn settle_upload(
    state: &AppState,
    session: Uuid,
    ticket: Uuid,
    result: Result<UploadCompletion, UploadError>,
) -> Result<WizardController, AppError> {
    match result {
        Ok(completion) => {
            let (controller, applied) = service::mutate(&state.drafts, session, |c| {
                Ok(c.complete_upload(ticket, completion))
            })
            .await?;
            if !applied {
                warn!("Upload {ticket} for session {session} was superseded; result discarded");
            }
            Ok(controller)
        }
        Err(e) => {
            error!("Resume upload failed for session {session}: {e}");
            let (controller, _) = service::mutate(&state.drafts, session, |c| {
                Ok(c.fail_upload(ticket, UPLOAD_FAILED_MESSAGE))
            })
            .await?;
            match e {
                UploadError::TooLarge { limit } => Err(AppError::Validation(format!(
                    "Resume must be at most {limit} bytes"
                ))),
                _ => Ok(controller),
            }
        }
    }
}

async fn read_field(
    field: &mut Field<'_>,
    reporter: &mut ProgressReporter,
    limit: u64,
) -> Result<bytes::Bytes, UploadError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| UploadError::Read(e.to_string()))?
    {
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(UploadError::TooLarge { limit });
        }
        reporter.advance(chunk.len() as u64);
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
