use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and which optional collaborators are wired.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "shortlist",
        "advisory": {
            "weights": state.ranker.uses_advisory_weights(),
            "commentary": state.ranker.has_commentary(),
            "model": state.config.groq_api_key.as_ref().map(|_| state.config.llm_model.as_str()),
        },
        "persistence": state.store.is_some(),
    }))
}
