//! Factor Scorer — four independent 0–100 sub-scores for a candidate/job pair.
//!
//! Every function here is total: absent candidate data degrades to a neutral
//! default instead of failing.

use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::scoring::skills::{normalize, normalize_set, percentage_match};

/// Points per extra skill beyond the requirement, and the bonus ceiling.
const EXTRA_SKILL_POINTS: f64 = 2.0;
const EXTRA_SKILL_BONUS_CAP: f64 = 10.0;

/// Penalty per missing year (under-qualified) and per surplus year (over-qualified).
const UNDER_QUALIFIED_PENALTY: f64 = 20.0;
const OVER_QUALIFIED_PENALTY: f64 = 10.0;
const OVER_QUALIFIED_FLOOR: f64 = 50.0;

const PARTIAL_LOCATION_BASE: f64 = 70.0;
const PARTIAL_LOCATION_STEP: f64 = 10.0;
const REMOTE_CANDIDATE_SCORE: f64 = 80.0;
const LOCATION_MISMATCH_SCORE: f64 = 40.0;

const UNKNOWN_EDUCATION_SCORE: f64 = 60.0;

/// The four unrounded sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub education: f64,
}

impl FactorScores {
    pub fn compute(candidate: &Candidate, job: &Job) -> Self {
        Self {
            skills: skills_score(candidate, job),
            experience: experience_score(candidate, job),
            location: location_score(candidate, job),
            education: education_score(candidate, job),
        }
    }
}

/// Skill overlap, plus a small bonus for breadth beyond the requirement.
///
/// The bonus compares distinct normalized skill counts, so repeated or
/// differently-cased entries on the candidate side earn nothing.
pub fn skills_score(candidate: &Candidate, job: &Job) -> f64 {
    let required = normalize_set(&job.required_skills);
    if required.is_empty() {
        return 100.0;
    }

    let base = percentage_match(&job.required_skills, &candidate.skills);
    let offered = normalize_set(&candidate.skills).len();

    if offered > required.len() {
        let extra = (offered - required.len()) as f64;
        let bonus = (extra * EXTRA_SKILL_POINTS).min(EXTRA_SKILL_BONUS_CAP);
        (base + bonus).min(100.0)
    } else {
        base
    }
}

/// Years of experience against the level's ideal range.
///
/// Under-qualification is penalized steeply; over-qualification gently, with a floor.
pub fn experience_score(candidate: &Candidate, job: &Job) -> f64 {
    let (min_years, max_years) = job.experience_level.ideal_years();
    let years = candidate.experience_years;

    if years < min_years {
        let gap = f64::from(min_years - years);
        (100.0 - gap * UNDER_QUALIFIED_PENALTY).max(0.0)
    } else if years > max_years {
        let gap = f64::from(years - max_years);
        (100.0 - gap * OVER_QUALIFIED_PENALTY).max(OVER_QUALIFIED_FLOOR)
    } else {
        100.0
    }
}

/// Location compatibility.
///
/// Remote jobs accept anyone. Otherwise the comma-separated parts of the job
/// location are looked up in the candidate's location parts. An empty part
/// (blank location, trailing comma) is contained in every candidate part and
/// counts as a match.
pub fn location_score(candidate: &Candidate, job: &Job) -> f64 {
    let job_location = normalize(&job.location);
    let candidate_location = normalize(&candidate.location);

    if job_location.contains("remote") {
        return 100.0;
    }
    if job_location == candidate_location {
        return 100.0;
    }

    let candidate_parts: Vec<&str> = candidate_location.split(',').collect();
    let matches = job_location
        .split(',')
        .map(str::trim)
        .filter(|part| candidate_parts.iter().any(|cp| cp.contains(part)))
        .count();

    if matches > 0 {
        return (PARTIAL_LOCATION_BASE + matches as f64 * PARTIAL_LOCATION_STEP).min(100.0);
    }
    if candidate_location.contains("remote") {
        return REMOTE_CANDIDATE_SCORE;
    }
    LOCATION_MISMATCH_SCORE
}

/// Highest degree mentioned in the free-text education field.
pub fn education_score(candidate: &Candidate, _job: &Job) -> f64 {
    let education = match candidate.education.as_deref().map(normalize) {
        Some(e) if !e.is_empty() => e,
        _ => return UNKNOWN_EDUCATION_SCORE,
    };

    if ["phd", "ph.d", "doctorate"].iter().any(|k| education.contains(k)) {
        100.0
    } else if education.contains("master") {
        90.0
    } else if education.contains("bachelor") {
        80.0
    } else {
        UNKNOWN_EDUCATION_SCORE
    }
}
