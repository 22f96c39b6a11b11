//! No-op embedder for testing.
//!
//! Returns zero-vectors for every input, making pipeline behavior
//! observable in tests without a provider.

use async_trait::async_trait;
use docrag_core::{EmbedError, Embedder};

/// No-op embedder that returns zero-vectors.
pub struct NoopEmbedder {
    dimension: usize,
}

impl NoopEmbedder {
    /// Create a no-op embedder with the default dimension (768).
    #[must_use]
    pub fn new() -> Self {
        Self { dimension: 768 }
    }

    /// Create a no-op embedder with a custom dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for NoopEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for NoopEmbedder {
    fn model_name(&self) -> &str {
        "noop"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimension]).collect())
    }
}
