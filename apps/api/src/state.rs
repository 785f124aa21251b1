use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ranker::CandidateRanker;
use crate::scoring::store::ShortlistStore;
use crate::sourcing::job_parser::JobParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Ranking engine. Advisors are wired at startup from `Config`.
    pub ranker: Arc<CandidateRanker>,
    pub job_parser: Arc<JobParser>,
    /// Present only when `DATABASE_URL` is configured.
    pub store: Option<ShortlistStore>,
}
