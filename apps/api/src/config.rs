use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::scoring::ranker::RankerConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL for shortlist persistence. Persistence is disabled when unset.
    pub database_url: Option<String>,
    /// Groq API key. Advisory weights and commentary are disabled when unset.
    pub groq_api_key: Option<String>,
    pub llm_model: String,
    pub use_ai_weights: bool,
    pub enable_commentary: bool,
    pub advisory_timeout_secs: u64,
    pub advisory_max_concurrency: usize,
    pub top_candidates_count: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            use_ai_weights: parse_env("USE_AI_WEIGHTS", true)?,
            enable_commentary: parse_env("ENABLE_COMMENTARY", true)?,
            advisory_timeout_secs: parse_env("ADVISORY_TIMEOUT_SECS", 5)?,
            advisory_max_concurrency: parse_env("ADVISORY_MAX_CONCURRENCY", 4)?,
            top_candidates_count: parse_env("TOP_CANDIDATES_COUNT", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The explicit ranking configuration handed to `CandidateRanker`.
    /// Scoring code never reads the environment itself.
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            use_advisory_weights: self.use_ai_weights,
            enable_commentary: self.enable_commentary,
            advisory_timeout: Duration::from_secs(self.advisory_timeout_secs),
            max_concurrent_advisory: self.advisory_max_concurrency.max(1),
            shortlist_size: self.top_candidates_count.max(1),
        }
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            database_url: None,
            groq_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            use_ai_weights: true,
            enable_commentary: false,
            advisory_timeout_secs: 3,
            advisory_max_concurrency: 0,
            top_candidates_count: 0,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_ranker_config_carries_toggles() {
        let ranker = sample_config().ranker_config();
        assert!(ranker.use_advisory_weights);
        assert!(!ranker.enable_commentary);
        assert_eq!(ranker.advisory_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_ranker_config_clamps_zero_sizes() {
        let ranker = sample_config().ranker_config();
        assert_eq!(ranker.max_concurrent_advisory, 1);
        assert_eq!(ranker.shortlist_size, 1);
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("SHORTLIST_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
