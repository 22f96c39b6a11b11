//! Core types for docrag.
//!
//! This module contains the shared data structures used across the
//! indexing and retrieval pipeline:
//!
//! ## Chunks
//! - [`Chunk`]: a contiguous span of extracted document text
//! - [`ChunkConfig`]: configuration for chunking behavior
//! - [`ChunkMetadata`]: the payload stored alongside each vector
//!
//! ## Index records
//! - [`EmbeddingRecord`]: a vector plus metadata, keyed by chunk id
//! - [`RetrievalMatch`]: a stored record returned from a similarity query
//! - [`SimilarityMetric`]: scoring function fixed per index

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Chunks
// ============================================================================

/// A contiguous, bounded-length span of a document's extracted text.
///
/// Offsets are character offsets into the extracted text, 0-based and
/// end-exclusive. `text` holds the span trimmed of leading and trailing
/// whitespace; the offsets describe the untrimmed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier, assigned when the chunk is materialized
    pub id: String,
    /// The chunk's text content
    pub text: String,
    /// Start offset in the source text
    pub start: usize,
    /// End offset in the source text (exclusive)
    pub end: usize,
}

impl Chunk {
    /// Create a chunk with a freshly generated id.
    #[must_use]
    pub fn new(text: String, start: usize, end: usize) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            text,
            start,
            end,
        }
    }

    /// Length of the untrimmed source window in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the source window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target chunk size in characters, measured from the window start
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkConfig {
    /// Validate the configuration. `chunk_size` must be positive.
    pub fn validate(&self) -> std::result::Result<(), crate::error::ConfigError> {
        if self.chunk_size == 0 {
            return Err(crate::error::ConfigError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}

/// Metadata stored with every vector, sufficient for citation and
/// document-scoped filtering without a second lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkMetadata {
    /// The chunk's text content
    pub text: String,
    /// Owning document identifier
    pub document_id: String,
    /// Human-readable title of the source document
    pub source: String,
    /// Start offset in the extracted text
    pub start: usize,
    /// End offset in the extracted text (exclusive)
    pub end: usize,
    /// Window length in characters
    pub length: usize,
}

// ============================================================================
// Index records
// ============================================================================

/// A vector plus metadata, keyed by chunk id, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Chunk id
    pub id: String,
    /// Dense embedding; length must match the index dimension
    pub vector: Vec<f32>,
    /// Stored payload
    pub metadata: ChunkMetadata,
}

/// A stored record returned from a similarity query. Higher score means
/// more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalMatch {
    /// Chunk id
    pub id: String,
    /// Index-native similarity score
    pub score: f32,
    /// Stored payload
    pub metadata: ChunkMetadata,
}

/// Similarity metric for vector scoring. Fixed per index at creation;
/// queries never select a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    Cosine,
    #[default]
    Dot,
}
