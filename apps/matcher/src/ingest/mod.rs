//! Best-effort text loading for uploaded resumes.
//!
//! PDF text comes from `pdf-extract`, plain text is decoded as lossy UTF-8.
//! Nothing here guarantees layout-faithful text; the extractors only need words.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type '{0}' (expected .pdf or .txt)")]
    Unsupported(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("document contains no text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Kind by file extension, case-insensitive.
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::Text),
            _ => Err(IngestError::Unsupported(file_name.to_string())),
        }
    }
}

/// Loads the text of one uploaded document. PDF parsing runs on the blocking pool;
/// a parser panic is reported as an unreadable PDF.
pub async fn load_document(file_name: &str, data: Bytes) -> Result<String, IngestError> {
    let text = match DocumentKind::from_file_name(file_name)? {
        DocumentKind::Text => String::from_utf8_lossy(&data).into_owned(),
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| IngestError::Pdf(e.to_string()))?
            .map_err(|e| IngestError::Pdf(e.to_string()))?,
    };

    if text.trim().is_empty() {
        return Err(IngestError::Empty);
    }

    debug!("Loaded {} chars from '{file_name}'", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_by_extension() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("notes.txt").unwrap(), DocumentKind::Text);
        assert!(matches!(
            DocumentKind::from_file_name("resume.docx"),
            Err(IngestError::Unsupported(_))
        ));
        assert!(DocumentKind::from_file_name("README").is_err());
    }

    #[tokio::test]
    async fn test_text_is_decoded_lossily() {
        let data = Bytes::from_static(b"Rust engineer \xff with 5 years");
        let text = load_document("cv.txt", data).await.unwrap();
        assert!(text.starts_with("Rust engineer"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let err = load_document("cv.txt", Bytes::from_static(b"  \n\t ")).await.unwrap_err();
        assert!(matches!(err, IngestError::Empty));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_an_error() {
        let err = load_document("cv.pdf", Bytes::from_static(b"not a pdf at all"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Pdf(_)));
    }
}
