//! Axum route handlers for job intake.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::job::Job;
use crate::sourcing::job_parser::RawJobPosting;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ParseJobResponse {
    pub job: Job,
    /// Problems with the submitted posting. Parsing still infers what it can.
    pub problems: Vec<String>,
    pub valid: bool,
}

/// POST /api/v1/jobs/parse
///
/// Structures a raw posting into a `Job` and reports missing fields.
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(raw): Json<RawJobPosting>,
) -> Result<Json<ParseJobResponse>, AppError> {
    if raw.title.as_deref().map_or(true, |t| t.trim().is_empty())
        && raw.description.as_deref().map_or(true, |d| d.trim().is_empty())
    {
        return Err(AppError::Validation(
            "title or description is required".to_string(),
        ));
    }

    let problems = state.job_parser.validate(&raw);
    let job = state.job_parser.parse(raw);

    Ok(Json(ParseJobResponse {
        valid: problems.is_empty(),
        job,
        problems,
    }))
}
