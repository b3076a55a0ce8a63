use std::sync::Arc;

use crate::config::Config;
use crate::embeddings::Embedder;
use crate::matching::pipeline::MatchContext;
use crate::matching::skill_extractor::SkillExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable skill extractor. Default: LlmSkillExtractor.
    pub skills: Arc<dyn SkillExtractor>,
    /// Pluggable embedder. Default: HttpEmbedder against `EMBEDDING_URL`.
    pub embedder: Arc<dyn Embedder>,
}

impl AppState {
    pub fn match_context(&self) -> MatchContext {
        MatchContext {
            skills: Arc::clone(&self.skills),
            embedder: Arc::clone(&self.embedder),
            threshold: self.config.skill_match_threshold,
            timeout: self.config.capability_timeout,
            concurrency: self.config.max_concurrent_evaluations,
        }
    }
}
