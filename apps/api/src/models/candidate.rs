use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// A sourced candidate. Read-only input to scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Persistence key, required only when the shortlist is saved.
    #[serde(default)]
    pub candidate_id: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_years: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub current_position: Option<String>,
}
