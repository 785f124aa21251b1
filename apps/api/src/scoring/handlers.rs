//! Axum route handlers for the Scoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::scoring::ranker::{RankedCandidate, RankingReport};
use crate::scoring::weights::ResolvedWeights;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WeightsRequest {
    pub job: Job,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job: Job,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub top_n: Option<usize>,
    /// `false` returns the bare ranked list without weights or statistics.
    #[serde(default = "default_true")]
    pub report: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RankResponse {
    Report(RankingReport),
    Candidates(Vec<RankedCandidate>),
}

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub job: Job,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub count: Option<usize>,
    /// Write the shortlist to `job_applications`. Needs `job.job_id` and a
    /// configured database.
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    #[serde(flatten)]
    pub report: RankingReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_ids: Option<Vec<i32>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/weights
///
/// Resolves the factor weights that a ranking run for this job would use.
pub async fn handle_resolve_weights(
    State(state): State<AppState>,
    Json(request): Json<WeightsRequest>,
) -> Result<Json<ResolvedWeights>, AppError> {
    Ok(Json(state.ranker.resolve_weights(&request.job).await))
}

/// POST /api/v1/rankings
///
/// Scores and orders the candidates. Commentary is attached only when
/// `top_n` is given.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let top_n = positive_limit("top_n", request.top_n)?;

    let response = if request.report {
        RankResponse::Report(
            state
                .ranker
                .rank_report(&request.candidates, &request.job, top_n)
                .await,
        )
    } else {
        RankResponse::Candidates(
            state
                .ranker
                .rank(&request.candidates, &request.job, top_n)
                .await,
        )
    };

    Ok(Json(response))
}

/// POST /api/v1/rankings/shortlist
///
/// Top candidates for a job, optionally persisted as shortlisted applications.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Json(request): Json<ShortlistRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let count = positive_limit("count", request.count)?;

    let persist_to = if request.persist {
        let job_id = request.job.job_id.ok_or_else(|| {
            AppError::UnprocessableEntity("persist requires job.job_id".to_string())
        })?;
        let store = state.store.as_ref().ok_or_else(|| {
            AppError::UnprocessableEntity("persistence is not configured".to_string())
        })?;
        Some((job_id, store))
    } else {
        None
    };

    let report = state
        .ranker
        .shortlist(&request.candidates, &request.job, count)
        .await;

    let application_ids = match persist_to {
        Some((job_id, store)) => {
            let ids = store.save_shortlist(job_id, &report.candidates).await?;
            info!(job_id, applications = ids.len(), "Shortlist persisted");
            Some(ids)
        }
        None => None,
    };

    Ok(Json(ShortlistResponse {
        report,
        application_ids,
    }))
}

/// Rejects an explicit limit of zero.
fn positive_limit(field: &str, value: Option<usize>) -> Result<Option<usize>, AppError> {
    match value {
        Some(0) => Err(AppError::Validation(format!("{field} must be at least 1"))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_limit() {
        assert_eq!(positive_limit("top_n", None).unwrap(), None);
        assert_eq!(positive_limit("top_n", Some(3)).unwrap(), Some(3));
        let err = positive_limit("count", Some(0)).unwrap_err();
        assert!(err.to_string().contains("count must be at least 1"));
    }

    #[test]
    fn test_rank_request_defaults_to_full_report() {
        let request: RankRequest =
            serde_json::from_str(r#"{"job": {"title": "QA Engineer"}}"#).unwrap();
        assert!(request.report);
        let request: RankRequest =
            serde_json::from_str(r#"{"job": {"title": "QA Engineer"}, "report": false}"#).unwrap();
        assert!(!request.report);
    }

    #[test]
    fn test_shortlist_request_defaults() {
        let request: ShortlistRequest =
            serde_json::from_str(r#"{"job": {"title": "QA Engineer"}}"#).unwrap();
        assert!(!request.persist);
        assert!(request.count.is_none());
        assert!(request.candidates.is_empty());
    }
}
