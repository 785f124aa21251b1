//! Skill Matcher — case/whitespace-insensitive overlap between two skill lists.

use std::collections::BTreeSet;

/// Normalizes text for comparison: trimmed and lowercased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalized, de-duplicated skill set. Blank entries are dropped.
pub fn normalize_set(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Percentage (0–100) of `required` skills present in `candidate`.
///
/// An empty requirement is trivially satisfied and scores 100.
pub fn percentage_match(required: &[String], candidate: &[String]) -> f64 {
    let required = normalize_set(required);
    if required.is_empty() {
        return 100.0;
    }
    let candidate = normalize_set(candidate);
    let matched = required.intersection(&candidate).count();
    matched as f64 / required.len() as f64 * 100.0
}

/// Required skills the candidate has.
pub fn matched_skills(required: &[String], candidate: &[String]) -> BTreeSet<String> {
    let candidate = normalize_set(candidate);
    normalize_set(required)
        .into_iter()
        .filter(|s| candidate.contains(s))
        .collect()
}

/// Required skills the candidate lacks.
pub fn missing_skills(required: &[String], candidate: &[String]) -> BTreeSet<String> {
    let candidate = normalize_set(candidate);
    normalize_set(required)
        .into_iter()
        .filter(|s| !candidate.contains(s))
        .collect()
}
