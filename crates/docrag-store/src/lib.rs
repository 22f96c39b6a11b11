//! Vector index implementations for docrag.
//!
//! Two implementations of the [`VectorIndex`](docrag_core::VectorIndex)
//! trait: [`MemoryIndex`] holds everything in process for tests and
//! development, and [`RestIndex`] adapts a remote Pinecone-style provider.

pub mod memory;
pub mod rest;

pub use memory::MemoryIndex;
pub use rest::{RestIndex, RestIndexConfig};
