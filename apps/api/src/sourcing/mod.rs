// Job intake: turns raw postings into the structured `Job` records scoring reads.

pub mod handlers;
pub mod job_parser;
