use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::matching::skills::DEFAULT_SKILL_MATCH_THRESHOLD;

const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or numbers don't parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub skill_match_threshold: f64,
    pub capability_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_concurrent_evaluations: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let skill_match_threshold: f64 = parse_env("SKILL_MATCH_THRESHOLD", DEFAULT_SKILL_MATCH_THRESHOLD)?;
        if !(0.0..=2.0).contains(&skill_match_threshold) {
            anyhow::bail!("SKILL_MATCH_THRESHOLD must be a cosine distance between 0 and 2");
        }

        let max_concurrent_evaluations: usize = parse_env("MAX_CONCURRENT_EVALUATIONS", 4)?;
        if max_concurrent_evaluations == 0 {
            anyhow::bail!("MAX_CONCURRENT_EVALUATIONS must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            embedding_url: require_env("EMBEDDING_URL")?,
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_api_key: std::env::var("EMBEDDING_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            skill_match_threshold,
            capability_timeout: Duration::from_secs(parse_env("CAPABILITY_TIMEOUT_SECS", 60)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_concurrent_evaluations,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_numbers() {
        assert_eq!(parse_value::<u16>("PORT", " 9000 ").unwrap(), 9000);
        assert_eq!(parse_value::<f64>("SKILL_MATCH_THRESHOLD", "0.3").unwrap(), 0.3);
    }

    #[test]
    fn test_parse_value_error_names_the_variable() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
