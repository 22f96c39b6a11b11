//! Word-boundary chunking for the docrag indexing pipeline.

pub mod window;

pub use window::{chunk, ChunkSpan, Chunks};
