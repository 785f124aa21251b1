//! Shortlist persistence — writes ranked candidates as job applications.

use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::scoring::ranker::RankedCandidate;

const SHORTLISTED_STATUS: &str = "shortlisted";

/// Postgres-backed sink for shortlists.
#[derive(Clone)]
pub struct ShortlistStore {
    pool: PgPool,
}

impl ShortlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one `job_applications` row per ranked candidate that carries a
    /// `candidate_id`. All rows commit together or not at all.
    ///
    /// Returns the new application ids in ranking order.
    pub async fn save_shortlist(
        &self,
        job_id: i32,
        shortlisted: &[RankedCandidate],
    ) -> Result<Vec<i32>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut application_ids = Vec::with_capacity(shortlisted.len());

        for entry in shortlisted {
            let Some(candidate_id) = entry.candidate.candidate_id else {
                continue;
            };

            let application_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO job_applications
                    (job_id, candidate_id, status, match_score, match_details, ranking)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING application_id
                "#,
            )
            .bind(job_id)
            .bind(candidate_id)
            .bind(SHORTLISTED_STATUS)
            .bind(entry.breakdown.overall_score)
            .bind(match_details(entry))
            .bind(entry.ranking as i32)
            .fetch_one(&mut *tx)
            .await?;

            application_ids.push(application_id);
        }

        tx.commit().await?;

        info!(
            job_id,
            saved = application_ids.len(),
            skipped = shortlisted.len() - application_ids.len(),
            "Saved shortlist"
        );
        Ok(application_ids)
    }
}

/// JSON stored alongside each application: the score breakdown plus any
/// commentary.
fn match_details(entry: &RankedCandidate) -> serde_json::Value {
    json!({
        "breakdown": entry.breakdown,
        "commentary": entry.commentary,
    })
}
