// Matching engine: semantic skill matching, whole-document fit, and the
// orchestrator that gates and ranks candidates against a job.
// All LLM calls go through llm_client, all vector calls through embeddings.

pub mod export;
pub mod fit_scoring;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod skill_extractor;
pub mod skills;
pub mod stop_words;
