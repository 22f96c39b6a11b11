//! # docrag-extract
//!
//! Content extraction for the docrag indexing pipeline.
//!
//! Implementations of the [`Extractor`](docrag_core::Extractor) trait that
//! turn raw document bytes into a single plain-text string for downstream
//! chunking and embedding:
//!
//! | Type | Input |
//! |------|-------|
//! | [`PdfExtractor`] | PDF bytes (text content; images and layout dropped) |
//! | [`PlainTextExtractor`] | UTF-8 bytes, passed through unchanged |
//!
//! Unparseable input fails with `ExtractError`; callers abort that
//! document's indexing rather than crashing the pipeline.

pub mod pdf;
pub mod text;

pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;
