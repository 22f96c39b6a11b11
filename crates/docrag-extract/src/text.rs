//! Plain-text extractor.

use async_trait::async_trait;
use docrag_core::{ExtractError, Extractor};

/// Extractor for documents that are already plain UTF-8 text. Useful for
/// development and for exercising the pipeline in tests without real PDF
/// fixtures.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new plain-text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractError> {
        let text = std::str::from_utf8(raw)?;
        Ok(text.to_string())
    }
}
