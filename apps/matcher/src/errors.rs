use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job description yields no weighted skill requirements")]
    NoRequirements,

    #[error("Skill extraction failed: {0}")]
    SkillExtraction(#[from] LlmError),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("{capability} did not respond within {secs}s")]
    CapabilityTimeout { capability: &'static str, secs: u64 },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Capability failures affect one evaluation only; batch callers skip the
    /// candidate instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::SkillExtraction(_)
                | AppError::Embedding(_)
                | AppError::CapabilityTimeout { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NoRequirements => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_REQUIREMENTS",
                self.to_string(),
            ),
            AppError::SkillExtraction(e) => {
                tracing::error!("Skill extraction error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SKILL_EXTRACTION_ERROR",
                    "The skill extraction service failed".to_string(),
                )
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EMBEDDING_ERROR",
                    "The embedding service failed".to_string(),
                )
            }
            AppError::CapabilityTimeout { .. } => {
                tracing::error!("{self}");
                (StatusCode::GATEWAY_TIMEOUT, "CAPABILITY_TIMEOUT", self.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NoRequirements, StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::SkillExtraction(LlmError::EmptyContent), StatusCode::BAD_GATEWAY),
            (
                AppError::Embedding(EmbeddingError::CountMismatch { expected: 2, got: 1 }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::CapabilityTimeout { capability: "embedding", secs: 60 },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (AppError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AppError::SkillExtraction(LlmError::NoJson).is_recoverable());
        assert!(AppError::CapabilityTimeout { capability: "skill extraction", secs: 5 }.is_recoverable());
        assert!(!AppError::NoRequirements.is_recoverable());
        assert!(!AppError::Validation("empty".into()).is_recoverable());
    }
}
