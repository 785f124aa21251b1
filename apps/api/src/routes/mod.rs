pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers as scoring;
use crate::sourcing::handlers as sourcing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job intake
        .route("/api/v1/jobs/parse", post(sourcing::handle_parse_job))
        // Scoring API
        .route("/api/v1/weights", post(scoring::handle_resolve_weights))
        .route("/api/v1/rankings", post(scoring::handle_rank))
        .route("/api/v1/rankings/shortlist", post(scoring::handle_shortlist))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::scoring::ranker::CandidateRanker;
    use crate::sourcing::job_parser::JobParser;

    fn test_state() -> AppState {
        let config = Config {
            database_url: None,
            groq_api_key: None,
            llm_model: "test-model".to_string(),
            use_ai_weights: false,
            enable_commentary: false,
            advisory_timeout_secs: 1,
            advisory_max_concurrency: 2,
            top_candidates_count: 2,
            port: 0,
            rust_log: "info".to_string(),
        };
        let ranker = CandidateRanker::with_advisors(config.ranker_config(), None, None);
        AppState {
            config,
            ranker: Arc::new(ranker),
            job_parser: Arc::new(JobParser::new().unwrap()),
            store: None,
        }
    }

    async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ranking_body() -> Value {
        json!({
            "job": {
                "job_id": 4,
                "title": "Senior Python Developer",
                "required_skills": ["Python", "AWS"],
                "experience_level": "senior",
                "location": "Remote"
            },
            "candidates": [
                {"candidate_id": 2, "full_name": "B", "skills": ["Python"], "experience_years": 1, "location": "Remote", "education": ""},
                {"candidate_id": 1, "full_name": "A", "skills": ["Python", "AWS", "Docker"], "experience_years": 10, "location": "NYC", "education": "Master's"},
                {"candidate_id": 3, "full_name": "C", "skills": [], "experience_years": 0}
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "shortlist");
        assert_eq!(body["advisory"]["weights"], false);
        assert!(body["advisory"]["model"].is_null());
        assert_eq!(body["persistence"], false);
    }

    #[tokio::test]
    async fn test_rankings_orders_candidates() {
        let (status, body) = send("POST", "/api/v1/rankings", Some(ranking_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_candidates"], 3);
        assert_eq!(body["weights"]["source"], "rule_based");

        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0]["candidate"]["full_name"], "A");
        assert_eq!(candidates[0]["ranking"], 1);
        assert_eq!(candidates[2]["ranking"], 3);
    }

    #[tokio::test]
    async fn test_rankings_bare_list_without_report() {
        let mut body = ranking_body();
        body["report"] = json!(false);
        body["top_n"] = json!(2);
        let (status, body) = send("POST", "/api/v1/rankings", Some(body)).await;
        assert_eq!(status, StatusCode::OK);

        let candidates = body.as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["candidate"]["full_name"], "A");
        assert_eq!(candidates[1]["ranking"], 2);
    }

    #[tokio::test]
    async fn test_rankings_rejects_zero_top_n() {
        let mut body = ranking_body();
        body["top_n"] = json!(0);
        let (status, body) = send("POST", "/api/v1/rankings", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_shortlist_defaults_to_configured_size() {
        let (status, body) = send("POST", "/api/v1/rankings/shortlist", Some(ranking_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"].as_array().unwrap().len(), 2);
        assert!(body.get("application_ids").is_none());
    }

    #[tokio::test]
    async fn test_shortlist_persist_without_store_is_unprocessable() {
        let mut body = ranking_body();
        body["persist"] = json!(true);
        let (status, body) = send("POST", "/api/v1/rankings/shortlist", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "persistence is not configured");
    }

    #[tokio::test]
    async fn test_shortlist_persist_without_job_id_is_unprocessable() {
        let mut body = ranking_body();
        body["persist"] = json!(true);
        body["job"]["job_id"] = Value::Null;
        let (status, body) = send("POST", "/api/v1/rankings/shortlist", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "persist requires job.job_id");
    }

    #[tokio::test]
    async fn test_weights_for_senior_technical_job() {
        let body = json!({"job": {"title": "Senior Backend Engineer", "experience_level": "senior"}});
        let (status, body) = send("POST", "/api/v1/weights", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "rule_based");
        let sum: f64 = ["skills_match", "experience_match", "location_match", "education_match"]
            .iter()
            .map(|k| body["weights"][k].as_f64().unwrap())
            .sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_parse_job() {
        let body = json!({
            "title": "Junior Frontend Developer",
            "description": "Build UIs with React and CSS. Location: New York, NY"
        });
        let (status, body) = send("POST", "/api/v1/jobs/parse", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job"]["experience_level"], "entry");
        assert_eq!(body["job"]["location"], "New York, NY");
        assert_eq!(body["job"]["department"], "Engineering");
        assert_eq!(body["valid"], false);
        assert_eq!(body["problems"][0], "Required skills must be specified");
    }

    #[tokio::test]
    async fn test_parse_job_requires_some_text() {
        let (status, _) = send("POST", "/api/v1/jobs/parse", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
