/// Prompt asking for factor weights. Placeholders are filled by `build_weights_prompt`.
pub const WEIGHTS_PROMPT_TEMPLATE: &str = r#"Analyze this job posting and determine optimal scoring weights for candidate ranking.

Job Title: {title}
Department: {department}
Required Skills: {skills}
Experience Level: {experience_level}
Location: {location}

Return ONLY a JSON object with these 4 weights (each between 0 and 1, summing to 1.0):
{
  "skills_match": <weight>,
  "experience_match": <weight>,
  "location_match": <weight>,
  "education_match": <weight>
}"#;

/// Prompt asking for a short fit assessment of one shortlisted candidate.
pub const COMMENTARY_PROMPT_TEMPLATE: &str = r#"Assess this candidate's fit for the job.

Job: {title}
Required Skills: {job_skills}

Candidate: {full_name}
Skills: {candidate_skills}
Experience: {experience_years} years
Position: {current_position}
Matched skills: {matched}
Missing skills: {missing}

Provide a brief (2-3 sentence) assessment of their fit. Be honest about strengths and potential concerns."#;

/// Number of skills quoted per side in the commentary prompt.
pub const COMMENTARY_SKILL_LIMIT: usize = 5;
