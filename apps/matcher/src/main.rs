mod config;
mod embeddings;
mod errors;
mod extraction;
mod ingest;
mod llm_client;
mod matching;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embeddings::HttpEmbedder;
use crate::llm_client::LlmClient;
use crate::matching::skill_extractor::LlmSkillExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize skill extraction (LLM-backed)
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());
    let skills = Arc::new(LlmSkillExtractor(llm));

    // Initialize embedding capability
    let embedder = HttpEmbedder::new(
        config.embedding_url.clone(),
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
    )?;
    info!(
        "Embedder initialized (model: {}, endpoint: {})",
        embedder.model(),
        config.embedding_url
    );

    info!(
        "Skill match threshold {}, capability timeout {:?}, {} concurrent evaluations",
        config.skill_match_threshold, config.capability_timeout, config.max_concurrent_evaluations
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        skills,
        embedder: Arc::new(embedder),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
