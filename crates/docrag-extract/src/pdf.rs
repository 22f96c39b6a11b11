//! PDF text extractor.
//!
//! Uses pdf-extract to pull textual content out of PDF bytes. Tables and
//! images collapse to text or are dropped.

use async_trait::async_trait;
use docrag_core::{ExtractError, Extractor};
use tracing::debug;

/// Extractor for PDF documents.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractError> {
        debug!("extracting pdf ({} bytes)", raw.len());

        // pdf-extract is a blocking parser
        let bytes = raw.to_vec();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("task join error: {e}")))?
        .map_err(ExtractError::Parse)?;

        debug!("extracted {} chars of text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_pdf_bytes() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"definitely not a pdf").await;
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_bytes() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_truncated_header() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract(b"%PDF-1.7\n").await.is_err());
    }
}
