//! Fit Scoring — whole-document semantic alignment between a resume and a job description.
//!
//! Independent of discrete skill matching: both texts are normalized, embedded as
//! single document vectors, and compared by cosine similarity.

use tracing::debug;

use crate::embeddings::{check_batch, cosine_similarity, Embedder, EmbeddingError};
use crate::matching::stop_words::is_stop_word;

/// Empirical calibration added to every percentage. Kept verbatim for score parity.
pub const FIT_CALIBRATION_OFFSET: f64 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Lowercases, replaces everything but `[a-z0-9]` and whitespace with spaces,
/// drops stop-words, and joins the remaining words with single spaces.
pub fn normalize_document(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| !is_stop_word(w))
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity of the two normalized documents as a percentage, plus
/// [`FIT_CALIBRATION_OFFSET`]. Returns 0 if either raw text is empty.
///
/// Nominally 0–100; identical documents score 105.
pub async fn overall_fit(
    text_a: &str,
    text_b: &str,
    embedder: &dyn Embedder,
) -> Result<f64, EmbeddingError> {
    if text_a.is_empty() || text_b.is_empty() {
        return Ok(0.0);
    }

    let documents = vec![normalize_document(text_a), normalize_document(text_b)];
    let vectors = embedder.embed(&documents).await?;
    check_batch(&vectors, documents.len())?;
    let [a, b] = vectors.as_slice() else {
        return Err(EmbeddingError::CountMismatch {
            expected: 2,
            got: vectors.len(),
        });
    };

    let similarity = cosine_similarity(a, b);
    let score = similarity * 100.0 + FIT_CALIBRATION_OFFSET;

    debug!(
        "Overall fit: similarity={similarity:.4}, score={score:.2} ({} / {} normalized chars)",
        documents[0].len(),
        documents[1].len()
    );

    Ok(score)
}
