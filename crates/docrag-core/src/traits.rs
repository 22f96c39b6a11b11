//! Core traits for docrag components.
//!
//! This module defines the trait seams between pipeline stages:
//!
//! - [`Extractor`]: convert raw document bytes into plain text
//! - [`Embedder`]: turn text into fixed-dimension dense vectors
//! - [`VectorIndex`]: store and search vectors scoped by document
//!
//! These traits enable a pluggable architecture where provider-backed
//! implementations and test doubles can be swapped without changing the
//! rest of the system.

use async_trait::async_trait;

use crate::error::{EmbedError, ExtractError, IndexError};
use crate::types::{EmbeddingRecord, RetrievalMatch};

// ============================================================================
// Extraction
// ============================================================================

/// Trait for converting raw document bytes into a single plain-text
/// representation. Formatting loss is acceptable; unparseable input is an
/// error, not a panic.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text from raw document bytes.
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractError>;
}

// ============================================================================
// Embedding
// ============================================================================

/// Trait for embedding providers.
///
/// Implementations perform a single provider call per invocation; retry
/// and batch postconditions live in the client wrapper, not here.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

// ============================================================================
// Vector index
// ============================================================================

/// Trait for the namespaced nearest-neighbor store.
///
/// The index namespace is shared across all documents; isolation between
/// documents is enforced by the `document_id` filter at query time, so
/// document-scoped callers must always pass it.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Configured vector dimension.
    fn dimension(&self) -> usize;

    /// Create the underlying namespace if absent. Idempotent; safe to call
    /// on every indexing pass.
    async fn ensure_ready(&self) -> Result<(), IndexError>;

    /// Insert or overwrite records by id.
    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<(), IndexError>;

    /// Return the `top_k` nearest records, best first, optionally
    /// restricted to a single owning document.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        document_id: Option<&str>,
    ) -> Result<Vec<RetrievalMatch>, IndexError>;

    /// Delete every record belonging to a document. Returns the number of
    /// records removed; a document with no records is a no-op.
    async fn delete_by_document(&self, document_id: &str) -> Result<u64, IndexError>;
}
