//! Error types for docrag.

use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Document extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Vector index operation failed
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Document extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Configuration errors, surfaced at construction time rather than per call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    #[error("embedder dimension {embedder} does not match index dimension {index}")]
    DimensionMismatch { embedder: usize, index: usize },
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// `embed` was called with an empty batch. Failing fast here is distinct
    /// from embedding empty strings, which is a valid provider request.
    #[error("empty batch: embed requires at least one input")]
    EmptyBatch,

    #[error("provider request failed: {0}")]
    Provider(String),

    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<EmbedError>,
    },

    #[error("embedding count mismatch: got {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("embedding dimension mismatch: got {got}, expected {expected}")]
    Dimension { expected: usize, got: usize },
}

/// Vector index errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index initialization failed: {0}")]
    Init(String),

    #[error("upsert failed: {0}")]
    Upsert(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Result type alias for docrag operations.
pub type Result<T> = std::result::Result<T, Error>;
