//! # docrag-index
//!
//! The write path of docrag: turning an uploaded document into indexed,
//! searchable chunks.
//!
//! [`DocumentIndexer`] orchestrates extract → chunk → embed → upsert for
//! one document, isolates failures per batch, and removes a document's
//! chunks in bulk when the document is deleted. Indexing normally runs as
//! a detached background task after the upload response returns; see
//! [`DocumentIndexer::index_document_detached`].

pub mod indexer;

pub use indexer::{DocumentIndexer, IndexSummary, IndexerConfig};
