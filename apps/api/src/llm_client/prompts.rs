// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file only holds cross-cutting system prompts.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for short free-text recruiter assessments.
pub const RECRUITER_SYSTEM: &str = "You are an experienced technical recruiter. \
    Write plainly and concisely. Do NOT invent facts about the candidate that are \
    not present in the provided profile. Do NOT restate the numeric score.";
