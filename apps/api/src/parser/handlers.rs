//! POST /api/v1/resume/parse

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::parser::DEFAULT_FILE_NAME;
use crate::state::AppState;

pub const FILENAME_HEADER: &str = "x-filename";

/// Takes the raw file as the request body and its name from `x-filename`.
/// Answers with the parser's JSON verbatim, or a generic 500 on any failure.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let file_name = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);

    match state.parser.parse(file_name, body).await {
        Ok(parsed) => (StatusCode::OK, Json(parsed)).into_response(),
        Err(e) => {
            error!("Error uploading to resume parser: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Upload failed" })),
            )
                .into_response()
        }
    }
}
