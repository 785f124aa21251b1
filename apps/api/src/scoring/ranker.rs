//! Candidate Ranker — scores a batch against one job, orders it, and shortlists.
//!
//! Flow: resolve weights once → score every candidate → stable sort by exact
//! overall score → assign ranks over the full list → truncate to top-N →
//! optional commentary for the shortlisted entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::LlmClient;
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::scoring::advisory::{AdvisoryError, CommentaryAdvisor, LlmAdvisor, WeightAdvisor};
use crate::scoring::scorer::{score, ScoreBreakdown};
use crate::scoring::weights::{ResolvedWeights, WeightResolver, WeightStrategy, Weights};

/// Explicit ranking configuration. Built once at startup; scoring never
/// consults ambient state.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Ask the weight advisor before falling back to the rule table.
    pub use_advisory_weights: bool,
    /// Attach advisory commentary to shortlisted candidates.
    pub enable_commentary: bool,
    /// Per-call budget for every advisory call.
    pub advisory_timeout: Duration,
    /// Upper bound on concurrent commentary calls.
    pub max_concurrent_advisory: usize,
    /// Default shortlist length.
    pub shortlist_size: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            use_advisory_weights: true,
            enable_commentary: true,
            advisory_timeout: Duration::from_secs(5),
            max_concurrent_advisory: 4,
            shortlist_size: 10,
        }
    }
}

/// A candidate with its score and position.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    /// 1 = best. Position in the full sorted list, even after truncation.
    pub ranking: usize,
    /// Unrounded overall score used for ordering.
    pub match_score: f64,
    pub breakdown: ScoreBreakdown,
    /// Advisory-only assessment. Absent when disabled or when the advisor failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// Result of one ranking run, with the weights and summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub ranking_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub job_title: String,
    pub weights: ResolvedWeights,
    /// Candidates scored, before truncation.
    pub total_candidates: usize,
    pub top_score: Option<f64>,
    /// Mean overall score of the returned candidates.
    pub average_score: Option<f64>,
    pub candidates: Vec<RankedCandidate>,
}

pub struct CandidateRanker {
    resolver: WeightResolver,
    commentary: Option<Arc<dyn CommentaryAdvisor>>,
    config: RankerConfig,
}

impl CandidateRanker {
    /// Wires the LLM-backed advisors when a client is available and the
    /// config enables them.
    pub fn new(config: RankerConfig, llm: Option<LlmClient>) -> Self {
        let advisor = llm.map(|client| Arc::new(LlmAdvisor::new(client)));
        Self::with_advisors(
            config,
            advisor.clone().map(|a| a as Arc<dyn WeightAdvisor>),
            advisor.map(|a| a as Arc<dyn CommentaryAdvisor>),
        )
    }

    pub fn with_advisors(
        config: RankerConfig,
        weight_advisor: Option<Arc<dyn WeightAdvisor>>,
        commentary: Option<Arc<dyn CommentaryAdvisor>>,
    ) -> Self {
        let resolver = match weight_advisor {
            Some(advisor) if config.use_advisory_weights => {
                WeightResolver::new(WeightStrategy::Advisory {
                    advisor,
                    timeout: config.advisory_timeout,
                })
            }
            _ => WeightResolver::rule_based(),
        };
        let commentary = commentary.filter(|_| config.enable_commentary);

        Self {
            resolver,
            commentary,
            config,
        }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn uses_advisory_weights(&self) -> bool {
        self.resolver.is_advisory()
    }

    pub fn has_commentary(&self) -> bool {
        self.commentary.is_some()
    }

    pub async fn resolve_weights(&self, job: &Job) -> ResolvedWeights {
        self.resolver.resolve(job).await
    }

    /// Ranks candidates for a job, returning at most `top_n` entries.
    pub async fn rank(
        &self,
        candidates: &[Candidate],
        job: &Job,
        top_n: Option<usize>,
    ) -> Vec<RankedCandidate> {
        self.rank_report(candidates, job, top_n).await.candidates
    }

    /// The top `count` candidates (configured shortlist size when `None`).
    pub async fn shortlist(
        &self,
        candidates: &[Candidate],
        job: &Job,
        count: Option<usize>,
    ) -> RankingReport {
        let count = count.unwrap_or(self.config.shortlist_size);
        let report = self.rank_report(candidates, job, Some(count)).await;
        info!(
            job_title = %job.title,
            shortlisted = report.candidates.len(),
            top_score = report.top_score.unwrap_or_default(),
            average_score = report.average_score.unwrap_or_default(),
            "Shortlist created"
        );
        report
    }

    /// Full ranking run. Always completes; advisory failures only degrade
    /// the weights or leave commentary empty.
    pub async fn rank_report(
        &self,
        candidates: &[Candidate],
        job: &Job,
        top_n: Option<usize>,
    ) -> RankingReport {
        info!(
            job_title = %job.title,
            candidates = candidates.len(),
            "Ranking candidates"
        );

        let weights = self.resolver.resolve(job).await;
        let mut ranked = rank_with_weights(candidates, job, &weights.weights);
        let total_candidates = ranked.len();

        if let Some(n) = top_n {
            ranked.truncate(n);
            if let Some(advisor) = &self.commentary {
                self.attach_commentary(advisor, job, &mut ranked).await;
            }
        }

        let top_score = ranked.first().map(|r| r.breakdown.overall_score);
        let average_score = (!ranked.is_empty()).then(|| {
            let sum: f64 = ranked.iter().map(|r| r.match_score).sum();
            (sum / ranked.len() as f64 * 100.0).round() / 100.0
        });

        if let Some(top) = top_score {
            info!(job_title = %job.title, top_score = top, "Ranked candidates");
        }

        RankingReport {
            ranking_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            job_title: job.title.clone(),
            weights,
            total_candidates,
            top_score,
            average_score,
            candidates: ranked,
        }
    }

    /// Requests commentary for each shortlisted entry on a bounded task set.
    /// A failed or slow call leaves that entry's commentary empty.
    async fn attach_commentary(
        &self,
        advisor: &Arc<dyn CommentaryAdvisor>,
        job: &Job,
        shortlisted: &mut [RankedCandidate],
    ) {
        let job = Arc::new(job.clone());
        let timeout = self.config.advisory_timeout;
        let limit = self.config.max_concurrent_advisory.max(1);

        let work: Vec<(usize, Candidate, ScoreBreakdown)> = shortlisted
            .iter()
            .enumerate()
            .map(|(idx, r)| (idx, r.candidate.clone(), r.breakdown.clone()))
            .collect();
        let mut pending = work.into_iter();
        let mut join_set: JoinSet<(usize, Result<String, AdvisoryError>)> = JoinSet::new();

        loop {
            while join_set.len() < limit {
                let Some((idx, candidate, breakdown)) = pending.next() else {
                    break;
                };
                let advisor = Arc::clone(advisor);
                let job = Arc::clone(&job);
                join_set.spawn(async move {
                    let result =
                        match tokio::time::timeout(timeout, advisor.assess(&job, &candidate, &breakdown))
                            .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(AdvisoryError::Timeout(timeout)),
                        };
                    (idx, result)
                });
            }

            match join_set.join_next().await {
                Some(Ok((idx, Ok(text)))) => shortlisted[idx].commentary = Some(text),
                Some(Ok((idx, Err(e)))) => warn!(
                    candidate = %shortlisted[idx].candidate.full_name,
                    "Commentary unavailable: {e}"
                ),
                Some(Err(e)) => warn!("Commentary task failed: {e}"),
                None => break,
            }
        }
    }
}

/// Scores and orders candidates with a fixed weight set.
///
/// Ties keep input order (`sort_by` is stable); ranks are 1-based positions.
pub fn rank_with_weights(
    candidates: &[Candidate],
    job: &Job,
    weights: &Weights,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|candidate| {
            let breakdown = score(candidate, job, weights);
            RankedCandidate {
                candidate: candidate.clone(),
                ranking: 0,
                match_score: breakdown.exact_overall(),
                breakdown,
                commentary: None,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.ranking = position + 1;
    }

    ranked
}
