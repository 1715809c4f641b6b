//! Axum route handlers for the analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::analysis::pipeline::{AnalysisResponse, AnalyzeRequest};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze-resume
///
/// Scores a resume (by URL or inline text) against a job description.
/// Unanalyzable requests still get a 200 with a fallback analysis; a body
/// that is not a valid request gets the JSON error envelope.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.pipeline.run(request).await?;
    Ok(Json(response))
}

/// OPTIONS /api/v1/analyze-resume
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}
