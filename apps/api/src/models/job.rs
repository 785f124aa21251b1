use serde::{Deserialize, Deserializer, Serialize};

use crate::models::null_as_default;

/// Seniority band of a job posting. Drives the experience ranges and the
/// rule-based weight table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Maps a free-text label onto a level. Unrecognized labels are `Mid`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "entry" => ExperienceLevel::Entry,
            "senior" => ExperienceLevel::Senior,
            _ => ExperienceLevel::Mid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }

    /// Ideal inclusive years-of-experience range for the level.
    pub fn ideal_years(&self) -> (u32, u32) {
        match self {
            ExperienceLevel::Entry => (0, 2),
            ExperienceLevel::Mid => (3, 7),
            ExperienceLevel::Senior => (8, 15),
        }
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .map(ExperienceLevel::from_label)
            .unwrap_or_default())
    }
}

/// A job posting. Read-only input to scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    /// Persistence key, present when the posting came from the jobs table.
    #[serde(default)]
    pub job_id: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default)]
    pub employment_type: Option<String>,
}

impl Job {
    pub fn is_remote(&self) -> bool {
        self.location.to_lowercase().contains("remote")
    }
}
