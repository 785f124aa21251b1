// Candidate scoring and ranking.
// Deterministic core: skills → factors → weights → scorer → ranker.
// Advisory LLM calls live behind the traits in `advisory` and never decide order.

pub mod advisory;
pub mod factors;
pub mod handlers;
pub mod prompts;
pub mod ranker;
pub mod scorer;
pub mod skills;
pub mod store;
pub mod weights;
