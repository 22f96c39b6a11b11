//! In-memory index for testing and development.
//!
//! This module provides a [`MemoryIndex`] that holds records in memory and
//! ranks them with brute-force similarity. It's useful for:
//! - Testing without a remote vector-index provider
//! - Development builds and examples
//! - Unit tests that don't need persistence

use async_trait::async_trait;
use docrag_core::{EmbeddingRecord, IndexError, RetrievalMatch, SimilarityMetric, VectorIndex};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory vector index.
///
/// Not suitable for production volumes; ranking is a linear scan. Scores
/// follow the configured metric, and equal scores keep insertion order
/// (stable sort), so ties are deterministic within this implementation.
pub struct MemoryIndex {
    dimension: usize,
    metric: SimilarityMetric,
    records: RwLock<HashMap<String, EmbeddingRecord>>,
    ready: RwLock<bool>,
}

impl MemoryIndex {
    /// Create an index with the given dimension and metric.
    #[must_use]
    pub fn new(dimension: usize, metric: SimilarityMetric) -> Self {
        Self {
            dimension,
            metric,
            records: RwLock::new(HashMap::new()),
            ready: RwLock::new(false),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the index holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        match self.metric {
            SimilarityMetric::Dot => dot,
            SimilarityMetric::Cosine => {
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    0.0
                } else {
                    dot / (norm_a * norm_b)
                }
            }
        }
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn ensure_ready(&self) -> Result<(), IndexError> {
        let mut ready = self.ready.write().await;
        if !*ready {
            debug!("MemoryIndex created (dimension: {})", self.dimension);
            *ready = true;
        }
        Ok(())
    }

    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<(), IndexError> {
        for record in records {
            if record.vector.len() != self.dimension {
                return Err(IndexError::Schema(format!(
                    "record {} has dimension {}, index expects {}",
                    record.id,
                    record.vector.len(),
                    self.dimension
                )));
            }
        }

        let mut store = self.records.write().await;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        debug!("upserted {} records", records.len());
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        document_id: Option<&str>,
    ) -> Result<Vec<RetrievalMatch>, IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::Schema(format!(
                "query vector has dimension {}, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let records = self.records.read().await;
        let mut scored: Vec<(f32, &EmbeddingRecord)> = records
            .values()
            .filter(|r| document_id.map_or(true, |id| r.metadata.document_id == id))
            .map(|r| (self.score(vector, &r.vector), r))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, record)| RetrievalMatch {
                id: record.id.clone(),
                score,
                metadata: record.metadata.clone(),
            })
            .collect())
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<u64, IndexError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.metadata.document_id != document_id);
        let deleted = (before - records.len()) as u64;
        debug!("deleted {} records for document {}", deleted, document_id);
        Ok(deleted)
    }
}
