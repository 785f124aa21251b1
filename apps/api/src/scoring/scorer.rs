//! Candidate Scorer — combines the four factor scores with a weight set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::scoring::factors::FactorScores;
use crate::scoring::skills::{matched_skills, missing_skills};
use crate::scoring::weights::{Weights, WEIGHT_SUM_TOLERANCE};

/// Per-candidate score report. Built once per candidate/job pair.
///
/// Reported scores are rounded to 2 dp; `exact_overall` keeps full precision
/// for ordering.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub location_score: f64,
    pub education_score: f64,
    pub weights_used: Weights,
    pub skills_matched: BTreeSet<String>,
    pub skills_missing: BTreeSet<String>,
    #[serde(skip)]
    exact_overall: f64,
}

impl ScoreBreakdown {
    /// Unrounded overall score.
    pub fn exact_overall(&self) -> f64 {
        self.exact_overall
    }
}

/// Scores one candidate against one job. Pure and infallible.
pub fn score(candidate: &Candidate, job: &Job, weights: &Weights) -> ScoreBreakdown {
    debug_assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    let factors = FactorScores::compute(candidate, job);
    let exact_overall = weights.combine(&factors).clamp(0.0, 100.0);

    ScoreBreakdown {
        overall_score: round2(exact_overall),
        skills_score: round2(factors.skills),
        experience_score: round2(factors.experience),
        location_score: round2(factors.location),
        education_score: round2(factors.education),
        weights_used: *weights,
        skills_matched: matched_skills(&job.required_skills, &candidate.skills),
        skills_missing: missing_skills(&job.required_skills, &candidate.skills),
        exact_overall,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
