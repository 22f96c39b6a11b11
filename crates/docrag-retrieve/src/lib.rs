//! # docrag-retrieve
//!
//! The read path of docrag: semantic retrieval over the vector index.
//!
//! [`Retriever`] answers per-document question-answering lookups and
//! cross-document search; [`build_context`] turns a ranked match list into
//! a bounded instruction string for the downstream chat agent, which calls
//! these as tools during its own reasoning loop.

pub mod context;
pub mod retriever;

pub use context::{assemble_context, build_context};
pub use retriever::{Retriever, RetrieverConfig};
