//! # docrag-core
//!
//! Core types and traits for the docrag document indexing and retrieval
//! pipeline.
//!
//! This crate provides the foundational abstractions used throughout
//! docrag:
//!
//! - **Extraction**: [`Extractor`] trait for turning document bytes into text
//! - **Embedding**: [`Embedder`] trait for converting text to vectors
//! - **Vector storage**: [`VectorIndex`] trait for similarity search with
//!   document-scoped filtering
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline pattern:
//!
//! ```text
//! bytes → Extractor → chunker → Embedder → VectorIndex
//!                                              ↓
//!                                    query → RetrievalMatch
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Chunk`] | A span of extracted text, the unit of embedding |
//! | [`ChunkMetadata`] | The payload stored with every vector |
//! | [`EmbeddingRecord`] | A vector plus metadata, keyed by chunk id |
//! | [`RetrievalMatch`] | A stored record returned from a query |
//! | [`SimilarityMetric`] | Scoring function, fixed per index |
//!
//! ## Related Crates
//!
//! - `docrag-extract`: PDF and plain-text extraction
//! - `docrag-chunker`: word-boundary sliding-window chunking
//! - `docrag-embed`: embedding client with retry and HTTP provider
//! - `docrag-store`: in-memory and remote vector index implementations
//! - `docrag-index`: per-document indexing pipeline
//! - `docrag-retrieve`: top-k retrieval, context assembly, document search

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChunkError, ConfigError, EmbedError, Error, ExtractError, IndexError, Result};
pub use traits::*;
pub use types::*;
