//! Job Parser — structures a raw job posting into a `Job`.
//!
//! Explicit fields always win. Missing ones are inferred from the title and
//! description with keyword lists and regexes; nothing here calls an LLM.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::job::{ExperienceLevel, Job};

/// Upper bound on skills inferred from a description.
pub const MAX_EXTRACTED_SKILLS: usize = 15;

const FALLBACK_SKILL: &str = "general";
const DEFAULT_LOCATION: &str = "Not specified";
const DEFAULT_DEPARTMENT: &str = "General";
const DEFAULT_EMPLOYMENT_TYPE: &str = "full-time";

// ────────────────────────────────────────────────────────────────────────────
// Keyword tables
// ────────────────────────────────────────────────────────────────────────────

const SKILL_VOCABULARY: &[&str] = &[
    // languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust",
    "php", "swift", "kotlin", "scala", "r", "matlab", "sql",
    // web
    "html", "css", "react", "angular", "vue", "node.js", "express", "django", "flask",
    "spring", "asp.net", "jquery", "bootstrap", "tailwind",
    // databases
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "cassandra", "dynamodb",
    "oracle", "sql server", "sqlite",
    // cloud and ops
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "gitlab", "github actions",
    "terraform", "ansible", "ci/cd", "devops",
    // data and ML
    "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
    "pandas", "numpy", "data analysis", "statistics", "nlp", "computer vision",
    // soft skills
    "communication", "leadership", "teamwork", "problem-solving", "agile", "scrum",
    "project management", "analytical thinking",
];

/// Checked in order; the first level with any hit wins.
const LEVEL_KEYWORDS: &[(ExperienceLevel, &[&str])] = &[
    (
        ExperienceLevel::Entry,
        &["entry", "junior", "graduate", "intern", "0-2 years", "beginner", "fresher"],
    ),
    (
        ExperienceLevel::Mid,
        &["mid", "intermediate", "3-5 years", "2-5 years", "experienced"],
    ),
    (
        ExperienceLevel::Senior,
        &["senior", "lead", "principal", "staff", "5+ years", "expert", "architect"],
    ),
];

const EMPLOYMENT_TYPES: &[&str] = &[
    "full-time", "part-time", "contract", "internship", "temporary", "freelance",
];

const DEPARTMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Engineering", &["engineer", "developer", "programmer", "software", "devops", "sre"]),
    ("Data Science", &["data scientist", "data analyst", "ml engineer", "ai", "machine learning"]),
    ("Product", &["product manager", "product owner", "pm"]),
    ("Design", &["designer", "ux", "ui", "graphic"]),
    ("Marketing", &["marketing", "seo", "content", "social media"]),
    ("Sales", &["sales", "account executive", "business development"]),
    ("HR", &["hr", "recruiter", "talent acquisition", "people"]),
    ("Finance", &["finance", "accountant", "controller", "cfo"]),
];

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// Required skills as submitted: a list, or one comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl SkillsInput {
    pub fn into_list(self) -> Vec<String> {
        match self {
            SkillsInput::List(skills) => skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            SkillsInput::Csv(text) => split_skills(&text),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            SkillsInput::List(skills) => skills.iter().all(|s| s.trim().is_empty()),
            SkillsInput::Csv(text) => split_skills(text).is_empty(),
        }
    }
}

/// A job posting before structuring. Only `title` and `description` are
/// expected; everything else is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJobPosting {
    #[serde(default)]
    pub job_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Option<SkillsInput>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Parser
// ────────────────────────────────────────────────────────────────────────────

pub struct JobParser {
    skill_patterns: Vec<(&'static str, Regex)>,
    experience_phrase: Regex,
    location_patterns: Vec<Regex>,
    remote: Regex,
}

impl JobParser {
    /// Compiles the vocabulary and location patterns.
    pub fn new() -> Result<Self, regex::Error> {
        let skill_patterns = SKILL_VOCABULARY
            .iter()
            .map(|skill| Ok((*skill, Regex::new(&skill_pattern(skill))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let location_patterns = [
            r"location[:\s]+([^.\n]+)",
            r"based in ([^.\n]+)",
            r"office in ([^.\n]+)",
        ]
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
        .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            skill_patterns,
            experience_phrase: Regex::new(r"experience (?:with|in) ([^.]+)")?,
            location_patterns,
            remote: RegexBuilder::new(r"\b(remote|work from home|wfh)\b")
                .case_insensitive(true)
                .build()?,
        })
    }

    pub fn parse(&self, raw: RawJobPosting) -> Job {
        let title = raw.title.unwrap_or_default().trim().to_string();
        let description = raw.description.unwrap_or_default();

        let required_skills = match raw.required_skills {
            Some(skills) => skills.into_list(),
            None => self.extract_skills(&description),
        };
        let experience_level = match non_blank(raw.experience_level) {
            Some(label) => ExperienceLevel::from_label(&label),
            None => infer_level(&title, &description),
        };
        let location =
            non_blank(raw.location).unwrap_or_else(|| self.extract_location(&description));
        let employment_type = non_blank(raw.employment_type)
            .unwrap_or_else(|| infer_employment_type(&description).to_string());
        let department =
            non_blank(raw.department).unwrap_or_else(|| infer_department(&title).to_string());

        info!(
            title = %title,
            level = experience_level.as_str(),
            skills = required_skills.len(),
            "Parsed job"
        );

        Job {
            job_id: raw.job_id,
            title,
            description: (!description.trim().is_empty()).then_some(description),
            required_skills,
            experience_level,
            location,
            department,
            employment_type: Some(employment_type),
        }
    }

    /// Lists what is missing from a posting. Empty means valid.
    pub fn validate(&self, raw: &RawJobPosting) -> Vec<String> {
        let mut problems = Vec::new();
        if is_blank(raw.title.as_deref()) {
            problems.push("Job title is required".to_string());
        }
        if is_blank(raw.description.as_deref()) {
            problems.push("Job description is required".to_string());
        }
        if raw.required_skills.as_ref().map_or(true, SkillsInput::is_empty) {
            problems.push("Required skills must be specified".to_string());
        }
        problems
    }

    /// Vocabulary hits first, then "experience with/in ..." phrases.
    /// Deduplicated, at most `MAX_EXTRACTED_SKILLS`, `["general"]` when empty.
    fn extract_skills(&self, description: &str) -> Vec<String> {
        let text = description.to_lowercase();
        let mut found: Vec<String> = Vec::new();
        let mut push = |skill: &str| {
            if !found.iter().any(|s| s == skill) {
                found.push(skill.to_string());
            }
        };

        for (skill, pattern) in &self.skill_patterns {
            if pattern.is_match(&text) {
                push(skill);
            }
        }

        for caps in self.experience_phrase.captures_iter(&text) {
            for part in caps[1].split(',') {
                let part = part.trim();
                let part = part
                    .strip_prefix("and ")
                    .or_else(|| part.strip_prefix("or "))
                    .unwrap_or(part)
                    .trim();
                if part.chars().count() > 2 {
                    push(part);
                }
            }
        }

        found.truncate(MAX_EXTRACTED_SKILLS);
        info!(skills = found.len(), "Extracted skills from description");

        if found.is_empty() {
            vec![FALLBACK_SKILL.to_string()]
        } else {
            found
        }
    }

    fn extract_location(&self, description: &str) -> String {
        for pattern in &self.location_patterns {
            if let Some(caps) = pattern.captures(description) {
                let location = caps[1].trim();
                if !location.is_empty() {
                    return location.to_string();
                }
            }
        }
        if self.remote.is_match(description) {
            return "Remote".to_string();
        }
        DEFAULT_LOCATION.to_string()
    }
}

/// `\b` only where the skill starts or ends on a word character, so
/// "c++" and "c#" still match.
fn skill_pattern(skill: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(skill.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(skill.chars().last()) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(skill))
}

fn infer_level(title: &str, description: &str) -> ExperienceLevel {
    let text = format!("{title} {description}").to_lowercase();
    LEVEL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or_default()
}

fn infer_employment_type(description: &str) -> &'static str {
    let text = description.to_lowercase();
    EMPLOYMENT_TYPES
        .iter()
        .find(|t| text.contains(*t))
        .copied()
        .unwrap_or(DEFAULT_EMPLOYMENT_TYPE)
}

fn infer_department(title: &str) -> &'static str {
    let title = title.to_lowercase();
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| title.contains(k)))
        .map(|(dept, _)| *dept)
        .unwrap_or(DEFAULT_DEPARTMENT)
}

fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
