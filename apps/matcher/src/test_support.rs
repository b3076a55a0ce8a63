//! Deterministic stand-ins for the embedding and skill-extraction capabilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::llm_client::LlmError;
use crate::matching::skill_extractor::SkillExtractor;
use crate::matching::skills::WeightedSkillMap;

/// 26-dimensional letter-frequency vectors. Identical strings get identical
/// vectors; strings sharing no letters are orthogonal.
pub struct LetterEmbedder;

pub fn letter_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0_f32; 26];
    for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
        v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| letter_vector(t)).collect())
    }
}

/// `LetterEmbedder` that records how it was called.
#[derive(Default)]
pub struct CountingEmbedder {
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts_seen(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        LetterEmbedder.embed(texts).await
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 503,
            message: "model loading".to_string(),
        })
    }
}

/// Returns a vector of a different length for every input text.
pub struct RaggedEmbedder;

#[async_trait]
impl Embedder for RaggedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok((0..texts.len()).map(|i| vec![1.0; i + 1]).collect())
    }
}

/// Returns canned skills. Resume skills are looked up by a marker substring of
/// the resume text; a resume containing `FAIL` yields an LLM error.
#[derive(Default)]
pub struct CannedSkillExtractor {
    pub weights: WeightedSkillMap,
    pub resume_skills: Vec<(&'static str, Vec<&'static str>)>,
    pub requests: Mutex<Vec<String>>,
}

#[async_trait]
impl SkillExtractor for CannedSkillExtractor {
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }
        if text.contains("FAIL") {
            return Err(LlmError::EmptyContent);
        }
        Ok(self
            .resume_skills
            .iter()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, skills)| skills.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default())
    }

    async fn extract_weighted_skills(
        &self,
        _job_text: &str,
        _role_hint: &str,
    ) -> Result<WeightedSkillMap, LlmError> {
        Ok(self.weights.clone())
    }
}
