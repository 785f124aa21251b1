mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod sourcing;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::ranker::CandidateRanker;
use crate::scoring::store::ShortlistStore;
use crate::sourcing::job_parser::JobParser;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (optional: advisory weights and commentary)
    let llm = match &config.groq_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.llm_model.clone())?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            warn!("GROQ_API_KEY not set; using rule-based weights without commentary");
            None
        }
    };

    // Initialize PostgreSQL (optional: shortlist persistence)
    let store = match &config.database_url {
        Some(url) => Some(ShortlistStore::new(create_pool(url).await?)),
        None => {
            info!("DATABASE_URL not set; shortlist persistence disabled");
            None
        }
    };

    let ranker = CandidateRanker::new(config.ranker_config(), llm);
    info!(
        advisory_weights = ranker.uses_advisory_weights(),
        commentary = ranker.has_commentary(),
        shortlist_size = ranker.config().shortlist_size,
        "Candidate ranker ready"
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        ranker: Arc::new(ranker),
        job_parser: Arc::new(JobParser::new()?),
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
