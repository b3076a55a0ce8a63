//! Embedding capability — text in, fixed-length vectors out.
//!
//! The matching core only sees the `Embedder` trait. `HttpEmbedder` talks to any
//! OpenAI-compatible `/v1/embeddings` endpoint (text-embeddings-inference, Ollama,
//! OpenAI) and is built once at startup, then shared read-only.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Expected {expected} vectors, got {got}")]
    CountMismatch { expected: usize, got: usize },
}

/// Batched text-to-vector capability. One output vector per input text, same order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Rejects a batch that cannot be compared: wrong vector count, empty vectors,
/// or vectors of differing dimension.
pub fn check_batch(vectors: &[Vec<f32>], expected: usize) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: vectors.len(),
        });
    }
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let dimension = first.len();
    if dimension == 0 {
        return Err(EmbeddingError::Malformed("empty embedding vector".to_string()));
    }
    if let Some(odd) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(EmbeddingError::Malformed(format!(
            "mixed embedding dimensions: {dimension} and {}",
            odd.len()
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Vector math
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity in [-1, 1]. Zero vectors and dimension mismatches give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// `1 - cosine_similarity`, in [0, 2].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP embedder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(url: String, model: String, api_key: Option<String>) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            url,
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.url).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        debug!(
            "Embedded {} texts with {} ({} vectors returned)",
            texts.len(),
            self.model,
            body.data.len()
        );

        order_by_index(body.data, texts.len())
    }
}

/// Endpoints may return items out of order; restore input order and check coverage.
fn order_by_index(items: Vec<EmbeddingItem>, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if items.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: items.len(),
        });
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in items {
        let slot = slots
            .get_mut(item.index)
            .ok_or_else(|| EmbeddingError::Malformed(format!("index {} out of range", item.index)))?;
        if slot.replace(item.embedding).is_some() {
            return Err(EmbeddingError::Malformed(format!(
                "duplicate index {}",
                item.index
            )));
        }
    }

    slots
        .into_iter()
        .map(|v| v.ok_or_else(|| EmbeddingError::Malformed("missing vector".to_string())))
        .collect()
}
