//! Top-k retrieval over the vector index.

use docrag_core::{ConfigError, Error, Result, RetrievalMatch, VectorIndex};
use docrag_embed::EmbeddingClient;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::context;

/// Configuration for the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Default number of chunks returned per retrieval
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Character budget for assembled context
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Match count requested for cross-document search before dedup
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_max_context_chars() -> usize {
    4000
}

fn default_search_top_k() -> usize {
    50
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_context_chars: default_max_context_chars(),
            search_top_k: default_search_top_k(),
        }
    }
}

/// The read path: embeds a query, asks the index for the nearest chunks,
/// and assembles bounded context for the downstream chat agent.
///
/// Failures propagate to the caller, which degrades (answers from general
/// knowledge, returns an empty result set) rather than crashing the
/// request.
pub struct Retriever {
    embedder: Arc<EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    config: RetrieverConfig,
}

impl Retriever {
    /// Create a retriever. Fails when the embedder and index disagree on
    /// vector dimension.
    pub fn new(
        embedder: Arc<EmbeddingClient>,
        index: Arc<dyn VectorIndex>,
        config: RetrieverConfig,
    ) -> std::result::Result<Self, ConfigError> {
        if embedder.dimension() != index.dimension() {
            return Err(ConfigError::DimensionMismatch {
                embedder: embedder.dimension(),
                index: index.dimension(),
            });
        }
        Ok(Self {
            embedder,
            index,
            config,
        })
    }

    /// Default result count from the configuration.
    pub fn default_top_k(&self) -> usize {
        self.config.top_k
    }

    /// Return the `top_k` chunks nearest to `query`, best first, optionally
    /// restricted to one document.
    ///
    /// A blank query returns no matches without touching the embedder or
    /// the index.
    pub async fn retrieve(
        &self,
        query: &str,
        document_id: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>> {
        if query.trim().is_empty() {
            debug!("blank query, skipping retrieval");
            return Ok(Vec::new());
        }

        let vector = self
            .embedder
            .embed_query(query)
            .await
            .map_err(Error::Embedding)?;

        let matches = self
            .index
            .query(&vector, top_k, document_id)
            .await
            .map_err(Error::Index)?;

        debug!("retrieved {} matches for query", matches.len());
        Ok(matches)
    }

    /// Assemble the instruction string for the downstream agent from a
    /// ranked match list, under this retriever's context budget.
    pub fn build_context(&self, query: &str, matches: &[RetrievalMatch]) -> String {
        context::build_context(query, matches, self.config.max_context_chars)
    }

    /// Rank documents for a free-text query.
    ///
    /// Runs an unfiltered retrieval with a larger `top_k`, then keeps each
    /// document id once, at the rank of its best-scoring chunk.
    pub async fn search_documents(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        let matches = self.retrieve(query, None, top_k).await?;

        let mut seen = HashSet::new();
        let mut documents = Vec::new();
        for m in matches {
            let document_id = m.metadata.document_id;
            if document_id.is_empty() {
                continue;
            }
            if seen.insert(document_id.clone()) {
                documents.push(document_id);
            }
        }
        Ok(documents)
    }

    /// [`search_documents`](Self::search_documents) with the configured
    /// default count.
    pub async fn search_documents_default(&self, query: &str) -> Result<Vec<String>> {
        self.search_documents(query, self.config.search_top_k).await
    }
}
