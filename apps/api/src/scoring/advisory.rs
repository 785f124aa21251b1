//! Advisory collaborators — optional, non-deterministic suggestions consulted
//! during ranking.
//!
//! Both capabilities return `Result`; callers pick the deterministic fallback
//! on the `Err` branch. `LlmAdvisor` implements both on top of `LlmClient`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RECRUITER_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::scoring::prompts::{
    COMMENTARY_PROMPT_TEMPLATE, COMMENTARY_SKILL_LIMIT, WEIGHTS_PROMPT_TEMPLATE,
};
use crate::scoring::scorer::ScoreBreakdown;
use crate::scoring::weights::{RawWeights, Weights};

const WEIGHTS_TEMPERATURE: f32 = 0.3;
const COMMENTARY_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("advisory call timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed advisory response: {0}")]
    Malformed(String),

    #[error("advisory returned no commentary")]
    Empty,
}

/// Suggests factor weights for a job.
#[async_trait]
pub trait WeightAdvisor: Send + Sync {
    async fn resolve(&self, job: &Job) -> Result<Weights, AdvisoryError>;
}

/// Writes a short free-text assessment of a scored candidate.
#[async_trait]
pub trait CommentaryAdvisor: Send + Sync {
    async fn assess(
        &self,
        job: &Job,
        candidate: &Candidate,
        breakdown: &ScoreBreakdown,
    ) -> Result<String, AdvisoryError>;
}

/// LLM-backed advisor for both weights and commentary.
pub struct LlmAdvisor {
    llm: LlmClient,
}

impl LlmAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl WeightAdvisor for LlmAdvisor {
    async fn resolve(&self, job: &Job) -> Result<Weights, AdvisoryError> {
        let prompt = build_weights_prompt(job);
        let raw: RawWeights = self
            .llm
            .call_json(&prompt, Some(JSON_ONLY_SYSTEM), WEIGHTS_TEMPERATURE)
            .await?;
        weights_from_advice(raw)
    }
}

#[async_trait]
impl CommentaryAdvisor for LlmAdvisor {
    async fn assess(
        &self,
        job: &Job,
        candidate: &Candidate,
        breakdown: &ScoreBreakdown,
    ) -> Result<String, AdvisoryError> {
        let prompt = build_commentary_prompt(job, candidate, breakdown);
        let text = self
            .llm
            .call_text(&prompt, Some(RECRUITER_SYSTEM), COMMENTARY_TEMPERATURE)
            .await?;
        clean_commentary(&text)
    }
}

/// Renormalizes advised weights so they sum to exactly 1.0, whatever the
/// advisor's raw scale.
pub fn weights_from_advice(raw: RawWeights) -> Result<Weights, AdvisoryError> {
    Weights::normalized(
        raw.skills_match,
        raw.experience_match,
        raw.location_match,
        raw.education_match,
    )
    .map_err(|e| AdvisoryError::Malformed(e.to_string()))
}

fn clean_commentary(text: &str) -> Result<String, AdvisoryError> {
    let text = text.trim();
    if text.is_empty() {
        Err(AdvisoryError::Empty)
    } else {
        Ok(text.to_string())
    }
}

fn build_weights_prompt(job: &Job) -> String {
    WEIGHTS_PROMPT_TEMPLATE
        .replace("{title}", or_unknown(&job.title))
        .replace("{department}", or_unknown(&job.department))
        .replace("{skills}", &job.required_skills.join(", "))
        .replace("{experience_level}", job.experience_level.as_str())
        .replace("{location}", or_unknown(&job.location))
}

fn build_commentary_prompt(job: &Job, candidate: &Candidate, breakdown: &ScoreBreakdown) -> String {
    let quote = |skills: &[String]| {
        skills
            .iter()
            .take(COMMENTARY_SKILL_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let list = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "none".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };

    COMMENTARY_PROMPT_TEMPLATE
        .replace("{title}", or_unknown(&job.title))
        .replace("{job_skills}", &quote(&job.required_skills))
        .replace("{full_name}", or_unknown(&candidate.full_name))
        .replace("{candidate_skills}", &quote(&candidate.skills))
        .replace("{experience_years}", &candidate.experience_years.to_string())
        .replace(
            "{current_position}",
            or_unknown(candidate.current_position.as_deref().unwrap_or_default()),
        )
        .replace("{matched}", &list(&breakdown.skills_matched))
        .replace("{missing}", &list(&breakdown.skills_missing))
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}
