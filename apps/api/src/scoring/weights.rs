//! Weight Resolver — decides how much each factor counts for a given job.
//!
//! Two strategies: an advisory collaborator (LLM-backed in production) and a
//! deterministic rule table. The advisory path always degrades to the rules.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::job::{ExperienceLevel, Job};
use crate::scoring::advisory::{AdvisoryError, WeightAdvisor};
use crate::scoring::factors::FactorScores;

/// Tolerance for the sum-to-one invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

const REMOTE_LOCATION_WEIGHT: f64 = 0.05;
const TECHNICAL_SKILLS_BOOST: f64 = 0.05;
const TECHNICAL_SKILLS_CEILING: f64 = 0.50;
const TECHNICAL_EDUCATION_CUT: f64 = 0.05;
const TECHNICAL_EDUCATION_FLOOR: f64 = 0.10;

const TECHNICAL_TITLE_KEYWORDS: &[&str] = &["engineer", "developer", "architect", "scientist"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("weight for {factor} is not a finite number")]
    NonFinite { factor: &'static str },

    #[error("weight for {factor} is negative ({value})")]
    Negative { factor: &'static str, value: f64 },

    #[error("weights sum to zero")]
    ZeroSum,

    #[error("weights sum to {sum}, expected 1.0")]
    SumMismatch { sum: f64 },
}

/// Unvalidated weights as they arrive from an advisor or a request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawWeights {
    pub skills_match: f64,
    pub experience_match: f64,
    pub location_match: f64,
    pub education_match: f64,
}

/// Relative importance of the four factors. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct Weights {
    skills_match: f64,
    experience_match: f64,
    location_match: f64,
    education_match: f64,
}

impl Weights {
    /// The base rule-table weights.
    pub const BASE: Weights = Weights {
        skills_match: 0.40,
        experience_match: 0.30,
        location_match: 0.15,
        education_match: 0.15,
    };

    /// Accepts weights that already sum to 1.0.
    pub fn try_new(
        skills_match: f64,
        experience_match: f64,
        location_match: f64,
        education_match: f64,
    ) -> Result<Self, WeightsError> {
        let sum = checked_sum(skills_match, experience_match, location_match, education_match)?;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::SumMismatch { sum });
        }
        Ok(Self {
            skills_match,
            experience_match,
            location_match,
            education_match,
        })
    }

    /// Divides each weight by the total so the result sums to 1.0.
    pub fn normalized(
        skills_match: f64,
        experience_match: f64,
        location_match: f64,
        education_match: f64,
    ) -> Result<Self, WeightsError> {
        let sum = checked_sum(skills_match, experience_match, location_match, education_match)?;
        if sum <= 0.0 {
            return Err(WeightsError::ZeroSum);
        }
        Ok(Self {
            skills_match: skills_match / sum,
            experience_match: experience_match / sum,
            location_match: location_match / sum,
            education_match: education_match / sum,
        })
    }

    pub fn skills_match(&self) -> f64 {
        self.skills_match
    }

    pub fn experience_match(&self) -> f64 {
        self.experience_match
    }

    pub fn location_match(&self) -> f64 {
        self.location_match
    }

    pub fn education_match(&self) -> f64 {
        self.education_match
    }

    pub fn sum(&self) -> f64 {
        self.skills_match + self.experience_match + self.location_match + self.education_match
    }

    /// Weighted sum of the sub-scores.
    pub fn combine(&self, scores: &FactorScores) -> f64 {
        scores.skills * self.skills_match
            + scores.experience * self.experience_match
            + scores.location * self.location_match
            + scores.education * self.education_match
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::BASE
    }
}

impl TryFrom<RawWeights> for Weights {
    type Error = WeightsError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        Weights::try_new(
            raw.skills_match,
            raw.experience_match,
            raw.location_match,
            raw.education_match,
        )
    }
}

fn checked_sum(skills: f64, experience: f64, location: f64, education: f64) -> Result<f64, WeightsError> {
    let factors = [
        ("skills_match", skills),
        ("experience_match", experience),
        ("location_match", location),
        ("education_match", education),
    ];
    for (factor, value) in factors {
        if !value.is_finite() {
            return Err(WeightsError::NonFinite { factor });
        }
        if value < 0.0 {
            return Err(WeightsError::Negative { factor, value });
        }
    }
    Ok(skills + experience + location + education)
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic weights from the job's level, remote flag, and title.
///
/// Adjustments apply in order: level table, remote shift, technical-title
/// shift. Some combinations leave the raw table off 1.0 (senior + technical
/// sums to 1.05, remote + technical to 0.95), so the result is renormalized.
pub fn rule_based_weights(job: &Job) -> Weights {
    let (mut skills, experience, mut location, mut education) = match job.experience_level {
        ExperienceLevel::Senior => (0.40, 0.35, 0.15, 0.10),
        ExperienceLevel::Entry => (0.45, 0.15, 0.15, 0.25),
        ExperienceLevel::Mid => (0.40, 0.30, 0.15, 0.15),
    };

    if job.is_remote() {
        let freed = location - REMOTE_LOCATION_WEIGHT;
        location = REMOTE_LOCATION_WEIGHT;
        skills += freed;
    }

    if is_technical_title(&job.title) {
        skills = (skills + TECHNICAL_SKILLS_BOOST).min(TECHNICAL_SKILLS_CEILING);
        education = (education - TECHNICAL_EDUCATION_CUT).max(TECHNICAL_EDUCATION_FLOOR);
    }

    // Every entry is positive, so normalization cannot fail.
    Weights::normalized(skills, experience, location, education).unwrap_or(Weights::BASE)
}

fn is_technical_title(title: &str) -> bool {
    let title = title.to_lowercase();
    TECHNICAL_TITLE_KEYWORDS.iter().any(|kw| title.contains(kw))
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Where a weight set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    Advisory,
    RuleBased,
}

/// Weights for one ranking run, with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedWeights {
    pub weights: Weights,
    pub source: WeightSource,
    /// Why the advisory path was abandoned, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// How weights are chosen.
pub enum WeightStrategy {
    RuleBased,
    Advisory {
        advisor: Arc<dyn WeightAdvisor>,
        timeout: Duration,
    },
}

pub struct WeightResolver {
    strategy: WeightStrategy,
}

impl WeightResolver {
    pub fn new(strategy: WeightStrategy) -> Self {
        Self { strategy }
    }

    pub fn rule_based() -> Self {
        Self::new(WeightStrategy::RuleBased)
    }

    pub fn is_advisory(&self) -> bool {
        matches!(self.strategy, WeightStrategy::Advisory { .. })
    }

    /// Resolves weights for a job. Never fails: any advisory error falls back
    /// to the rule table.
    pub async fn resolve(&self, job: &Job) -> ResolvedWeights {
        let (advisor, timeout) = match &self.strategy {
            WeightStrategy::RuleBased => return rules_for(job, None),
            WeightStrategy::Advisory { advisor, timeout } => (advisor, *timeout),
        };

        let outcome = match tokio::time::timeout(timeout, advisor.resolve(job)).await {
            Ok(result) => result,
            Err(_) => Err(AdvisoryError::Timeout(timeout)),
        };

        match outcome {
            Ok(weights) => {
                info!(
                    job_title = %job.title,
                    skills = weights.skills_match(),
                    experience = weights.experience_match(),
                    location = weights.location_match(),
                    education = weights.education_match(),
                    "Advisory weights accepted"
                );
                ResolvedWeights {
                    weights,
                    source: WeightSource::Advisory,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                warn!(job_title = %job.title, "Advisory weights unavailable, using rule table: {e}");
                rules_for(job, Some(e.to_string()))
            }
        }
    }
}

fn rules_for(job: &Job, fallback_reason: Option<String>) -> ResolvedWeights {
    let weights = rule_based_weights(job);
    info!(
        job_title = %job.title,
        level = job.experience_level.as_str(),
        skills = weights.skills_match(),
        experience = weights.experience_match(),
        location = weights.location_match(),
        education = weights.education_match(),
        "Rule-based weights"
    );
    ResolvedWeights {
        weights,
        source: WeightSource::RuleBased,
        fallback_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn job(level: ExperienceLevel, title: &str, location: &str) -> Job {
        Job {
            title: title.to_string(),
            required_skills: vec!["Python".to_string()],
            experience_level: level,
            location: location.to_string(),
            department: "Engineering".to_string(),
            ..Job::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_weights(w: &Weights, expected: (f64, f64, f64, f64)) {
        assert_close(w.skills_match(), expected.0);
        assert_close(w.experience_match(), expected.1);
        assert_close(w.location_match(), expected.2);
        assert_close(w.education_match(), expected.3);
    }

    // ── invariant ─────────────────────────────────────────────────────────

    #[test]
    fn test_try_new_rejects_bad_sum() {
        assert!(matches!(
            Weights::try_new(0.5, 0.5, 0.5, 0.5),
            Err(WeightsError::SumMismatch { .. })
        ));
        assert!(Weights::try_new(0.25, 0.25, 0.25, 0.25).is_ok());
    }

    #[test]
    fn test_try_new_rejects_negative_and_nan() {
        assert!(matches!(
            Weights::try_new(1.2, -0.2, 0.0, 0.0),
            Err(WeightsError::Negative { factor: "experience_match", .. })
        ));
        assert!(matches!(
            Weights::try_new(f64::NAN, 0.0, 0.0, 1.0),
            Err(WeightsError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_normalized_divides_by_sum() {
        let w = Weights::normalized(4.0, 3.0, 2.0, 1.0).unwrap();
        assert_weights(&w, (0.4, 0.3, 0.2, 0.1));
        assert!(matches!(
            Weights::normalized(0.0, 0.0, 0.0, 0.0),
            Err(WeightsError::ZeroSum)
        ));
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let ok: Result<Weights, _> = serde_json::from_str(
            r#"{"skills_match": 0.4, "experience_match": 0.3, "location_match": 0.15, "education_match": 0.15}"#,
        );
        assert!(ok.is_ok());
        let bad: Result<Weights, _> = serde_json::from_str(
            r#"{"skills_match": 0.9, "experience_match": 0.3, "location_match": 0.15, "education_match": 0.15}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_combine_is_dot_product() {
        let scores = FactorScores {
            skills: 100.0,
            experience: 50.0,
            location: 40.0,
            education: 60.0,
        };
        // 40 + 15 + 6 + 9
        assert_close(Weights::BASE.combine(&scores), 70.0);
    }

    // ── rule table ────────────────────────────────────────────────────────

    #[test]
    fn test_rules_base_mid() {
        let w = rule_based_weights(&job(ExperienceLevel::Mid, "Account Manager", "Chicago, IL"));
        assert_weights(&w, (0.40, 0.30, 0.15, 0.15));
    }

    #[test]
    fn test_rules_senior() {
        let w = rule_based_weights(&job(ExperienceLevel::Senior, "Sales Director", "Chicago, IL"));
        assert_weights(&w, (0.40, 0.35, 0.15, 0.10));
    }

    #[test]
    fn test_rules_entry() {
        let w = rule_based_weights(&job(ExperienceLevel::Entry, "Support Associate", "Chicago, IL"));
        assert_weights(&w, (0.45, 0.15, 0.15, 0.25));
    }

    #[test]
    fn test_rules_remote_moves_location_to_skills() {
        let w = rule_based_weights(&job(ExperienceLevel::Mid, "Account Manager", "Remote"));
        assert_weights(&w, (0.50, 0.30, 0.05, 0.15));
    }

    #[test]
    fn test_rules_technical_title() {
        let w = rule_based_weights(&job(ExperienceLevel::Mid, "Software Engineer", "Chicago, IL"));
        assert_weights(&w, (0.45, 0.30, 0.15, 0.10));
    }

    #[test]
    fn test_rules_senior_technical_renormalized() {
        // raw (0.45, 0.35, 0.15, 0.10) sums to 1.05
        let w = rule_based_weights(&job(ExperienceLevel::Senior, "Senior Developer", "Chicago, IL"));
        assert_weights(&w, (0.45 / 1.05, 0.35 / 1.05, 0.15 / 1.05, 0.10 / 1.05));
    }

    #[test]
    fn test_rules_remote_technical_renormalized() {
        // raw (0.50, 0.30, 0.05, 0.10) sums to 0.95
        let w = rule_based_weights(&job(ExperienceLevel::Mid, "Data Scientist", "Remote"));
        assert_weights(&w, (0.50 / 0.95, 0.30 / 0.95, 0.05 / 0.95, 0.10 / 0.95));
    }

    #[test]
    fn test_rules_sum_to_one_for_every_branch() {
        let levels = [ExperienceLevel::Entry, ExperienceLevel::Mid, ExperienceLevel::Senior];
        let titles = ["Office Manager", "Platform Architect", "ML Scientist", "Web Developer"];
        let locations = ["Remote", "Remote - EU", "New York, NY", ""];
        for level in levels {
            for title in titles {
                for location in locations {
                    let w = rule_based_weights(&job(level, title, location));
                    assert!(
                        (w.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE,
                        "{level:?}/{title}/{location} summed to {}",
                        w.sum()
                    );
                    for v in [
                        w.skills_match(),
                        w.experience_match(),
                        w.location_match(),
                        w.education_match(),
                    ] {
                        assert!(v > 0.0 && v < 1.0);
                    }
                }
            }
        }
    }

    // ── resolver ──────────────────────────────────────────────────────────

    struct FixedAdvisor(Weights);

    #[async_trait]
    impl WeightAdvisor for FixedAdvisor {
        async fn resolve(&self, _job: &Job) -> Result<Weights, AdvisoryError> {
            Ok(self.0)
        }
    }

    struct FailingAdvisor;

    #[async_trait]
    impl WeightAdvisor for FailingAdvisor {
        async fn resolve(&self, _job: &Job) -> Result<Weights, AdvisoryError> {
            Err(AdvisoryError::Malformed("missing education_match".to_string()))
        }
    }

    struct StalledAdvisor;

    #[async_trait]
    impl WeightAdvisor for StalledAdvisor {
        async fn resolve(&self, _job: &Job) -> Result<Weights, AdvisoryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Weights::BASE)
        }
    }

    fn advisory(advisor: impl WeightAdvisor + 'static) -> WeightResolver {
        WeightResolver::new(WeightStrategy::Advisory {
            advisor: Arc::new(advisor),
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn test_rule_based_resolver() {
        let resolved = WeightResolver::rule_based()
            .resolve(&job(ExperienceLevel::Senior, "Sales Director", "Chicago, IL"))
            .await;
        assert_eq!(resolved.source, WeightSource::RuleBased);
        assert!(resolved.fallback_reason.is_none());
        assert_weights(&resolved.weights, (0.40, 0.35, 0.15, 0.10));
    }

    #[tokio::test]
    async fn test_advisory_weights_used_when_available() {
        let advised = Weights::try_new(0.25, 0.25, 0.25, 0.25).unwrap();
        let resolved = advisory(FixedAdvisor(advised))
            .resolve(&job(ExperienceLevel::Mid, "Engineer", "Remote"))
            .await;
        assert_eq!(resolved.source, WeightSource::Advisory);
        assert_eq!(resolved.weights, advised);
    }

    #[tokio::test]
    async fn test_advisory_error_falls_back_silently() {
        let resolved = advisory(FailingAdvisor)
            .resolve(&job(ExperienceLevel::Mid, "Account Manager", "Remote"))
            .await;
        assert_eq!(resolved.source, WeightSource::RuleBased);
        assert_weights(&resolved.weights, (0.50, 0.30, 0.05, 0.15));
        assert!(resolved
            .fallback_reason
            .as_deref()
            .unwrap_or_default()
            .contains("education_match"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_advisory_timeout_falls_back() {
        let resolved = advisory(StalledAdvisor)
            .resolve(&job(ExperienceLevel::Entry, "Support Associate", "Chicago, IL"))
            .await;
        assert_eq!(resolved.source, WeightSource::RuleBased);
        assert!(resolved
            .fallback_reason
            .as_deref()
            .unwrap_or_default()
            .contains("timed out"));
    }

    #[test]
    fn test_resolved_weights_serialize_shape() {
        let resolved = ResolvedWeights {
            weights: Weights::BASE,
            source: WeightSource::RuleBased,
            fallback_reason: None,
        };
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["source"], "rule_based");
        assert_eq!(value["weights"]["skills_match"], 0.4);
        assert!(value.get("fallback_reason").is_none());
    }
}
