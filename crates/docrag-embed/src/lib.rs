//! # docrag-embed
//!
//! Embedding generation for docrag via a remote provider.
//!
//! The pipeline talks to [`EmbeddingClient`], which wraps any
//! [`Embedder`](docrag_core::Embedder) with an empty-batch precondition,
//! bounded retry, and a one-vector-per-input postcondition.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EmbeddingClient`] | Retry wrapper with batch postconditions |
//! | [`RetryPolicy`] | Bounded attempts with an inter-attempt pause |
//! | [`HttpEmbedder`] | OpenAI-compatible REST provider |
//! | [`NoopEmbedder`] | Zero-vector test double |

pub mod client;
pub mod http;
pub mod noop;
pub mod retry;

pub use client::EmbeddingClient;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
pub use noop::NoopEmbedder;
pub use retry::RetryPolicy;
