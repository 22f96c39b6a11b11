//! Per-document indexing pipeline.

use docrag_core::{
    Chunk, ChunkConfig, ChunkMetadata, ConfigError, EmbeddingRecord, Error, Extractor, Result,
    VectorIndex,
};
use docrag_embed::EmbeddingClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Configuration for the indexing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,
    /// Chunks per embed/upsert batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    32
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            batch_size: default_batch_size(),
        }
    }
}

/// Outcome of indexing one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Chunks successfully embedded and upserted
    pub chunks_indexed: usize,
}

/// Indexing pipeline for one document at a time: extract → chunk → embed →
/// upsert, plus bulk deletion when the owning document goes away.
///
/// Components are injected at construction; cloning shares them, so
/// handing an indexer to a background task is cheap.
#[derive(Clone)]
pub struct DocumentIndexer {
    extractor: Arc<dyn Extractor>,
    embedder: Arc<EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    config: IndexerConfig,
}

impl DocumentIndexer {
    /// Create an indexer.
    ///
    /// Fails when the chunk configuration is invalid or the embedder and
    /// index disagree on vector dimension. Both are deployment mistakes
    /// caught here once rather than per call.
    pub fn new(
        extractor: Arc<dyn Extractor>,
        embedder: Arc<EmbeddingClient>,
        index: Arc<dyn VectorIndex>,
        config: IndexerConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.chunk.validate()?;
        if embedder.dimension() != index.dimension() {
            return Err(ConfigError::DimensionMismatch {
                embedder: embedder.dimension(),
                index: index.dimension(),
            });
        }
        Ok(Self {
            extractor,
            embedder,
            index,
            config,
        })
    }

    /// Index one document's raw bytes under `document_id`, labelling every
    /// chunk with `title` for citation.
    ///
    /// A batch that fails to embed or upsert is logged and skipped; the
    /// remaining batches still run, and the summary counts only chunks
    /// that made it into the index. Extraction failure aborts the whole
    /// document.
    ///
    /// Re-running this for a document that is still indexed adds a second
    /// set of chunks under fresh ids; there is no deduplication against
    /// prior runs. Call [`delete_document`](Self::delete_document) first
    /// for replace semantics.
    pub async fn index_document(
        &self,
        raw: &[u8],
        document_id: &str,
        title: &str,
    ) -> Result<IndexSummary> {
        let text = self.extractor.extract(raw).await?;

        let chunks: Vec<Chunk> = docrag_chunker::chunk(&text, &self.config.chunk)?
            .map(|span| Chunk::new(span.text, span.start, span.end))
            .collect();

        if chunks.is_empty() {
            debug!("document {document_id} produced no chunks");
            return Ok(IndexSummary { chunks_indexed: 0 });
        }

        self.index.ensure_ready().await.map_err(Error::Index)?;

        let mut indexed = 0;
        for (batch_no, batch) in chunks.chunks(self.config.batch_size).enumerate() {
            match self.index_batch(batch, document_id, title).await {
                Ok(count) => {
                    indexed += count;
                    info!(
                        "upserted batch {batch_no} ({count} chunks) for document {document_id}"
                    );
                }
                Err(e) => {
                    warn!("batch {batch_no} failed for document {document_id}: {e}");
                }
            }
        }

        Ok(IndexSummary {
            chunks_indexed: indexed,
        })
    }

    async fn index_batch(
        &self,
        batch: &[Chunk],
        document_id: &str,
        title: &str,
    ) -> Result<usize> {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await.map_err(Error::Embedding)?;

        let records: Vec<EmbeddingRecord> = batch
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| EmbeddingRecord {
                id: chunk.id.clone(),
                vector,
                metadata: ChunkMetadata {
                    text: chunk.text.clone(),
                    document_id: document_id.to_string(),
                    source: title.to_string(),
                    start: chunk.start,
                    end: chunk.end,
                    length: chunk.len(),
                },
            })
            .collect();

        self.index.upsert(&records).await.map_err(Error::Index)?;
        Ok(records.len())
    }

    /// Remove every indexed chunk belonging to `document_id`. Safe to call
    /// for a document with nothing indexed.
    pub async fn delete_document(&self, document_id: &str) -> Result<u64> {
        let deleted = self
            .index
            .delete_by_document(document_id)
            .await
            .map_err(Error::Index)?;
        debug!("deleted {deleted} chunks for document {document_id}");
        Ok(deleted)
    }

    /// Index a document on a background task, detached from the caller.
    ///
    /// The upload response does not wait for indexing; failures are logged
    /// and the document simply stays unsearchable.
    pub fn index_document_detached(
        &self,
        raw: Vec<u8>,
        document_id: String,
        title: String,
    ) -> JoinHandle<()> {
        let indexer = self.clone();
        tokio::spawn(async move {
            match indexer.index_document(&raw, &document_id, &title).await {
                Ok(summary) => {
                    info!(
                        "indexed document {document_id} ({} chunks)",
                        summary.chunks_indexed
                    );
                }
                Err(e) => {
                    error!("failed to index document {document_id}: {e}");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docrag_core::{EmbedError, Embedder, ExtractError, IndexError, RetrievalMatch};
    use docrag_embed::RetryPolicy;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    const TEST_DIM: usize = 4;

    struct StubExtractor {
        text: String,
    }

    #[async_trait]
    impl Extractor for StubExtractor {
        async fn extract(&self, _raw: &[u8]) -> std::result::Result<String, ExtractError> {
            Ok(self.text.clone())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl Extractor for FailingExtractor {
        async fn extract(&self, _raw: &[u8]) -> std::result::Result<String, ExtractError> {
            Err(ExtractError::Parse("broken document".to_string()))
        }
    }

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        fn model_name(&self) -> &str {
            "counting"
        }

        fn dimension(&self) -> usize {
            TEST_DIM
        }

        async fn embed(
            &self,
            texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, EmbedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![0.1; TEST_DIM]).collect())
        }
    }

    /// Embedder that fails whenever the batch contains a marker string.
    struct PoisonEmbedder {
        marker: &'static str,
    }

    #[async_trait]
    impl Embedder for PoisonEmbedder {
        fn model_name(&self) -> &str {
            "poison"
        }

        fn dimension(&self) -> usize {
            TEST_DIM
        }

        async fn embed(
            &self,
            texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, EmbedError> {
            if texts.iter().any(|t| t.contains(self.marker)) {
                return Err(EmbedError::Provider("poisoned batch".to_string()));
            }
            Ok(texts.iter().map(|_| vec![0.1; TEST_DIM]).collect())
        }
    }

    struct RecordingIndex {
        dimension: usize,
        records: RwLock<Vec<EmbeddingRecord>>,
        ready_calls: AtomicUsize,
    }

    impl RecordingIndex {
        fn new(dimension: usize) -> Self {
            Self {
                dimension,
                records: RwLock::new(Vec::new()),
                ready_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        fn dimension(&self) -> usize {
            self.dimension
        }

        async fn ensure_ready(&self) -> std::result::Result<(), IndexError> {
            self.ready_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn upsert(
            &self,
            records: &[EmbeddingRecord],
        ) -> std::result::Result<(), IndexError> {
            self.records.write().await.extend_from_slice(records);
            Ok(())
        }

        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
            _document_id: Option<&str>,
        ) -> std::result::Result<Vec<RetrievalMatch>, IndexError> {
            Ok(vec![])
        }

        async fn delete_by_document(
            &self,
            document_id: &str,
        ) -> std::result::Result<u64, IndexError> {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.metadata.document_id != document_id);
            Ok((before - records.len()) as u64)
        }
    }

    fn indexer_with(
        text: &str,
        embedder: Arc<dyn Embedder>,
        index: Arc<RecordingIndex>,
        config: IndexerConfig,
    ) -> DocumentIndexer {
        DocumentIndexer::new(
            Arc::new(StubExtractor {
                text: text.to_string(),
            }),
            Arc::new(EmbeddingClient::with_policy(embedder, RetryPolicy::none())),
            index,
            config,
        )
        .unwrap()
    }

    fn small_chunks() -> IndexerConfig {
        IndexerConfig {
            chunk: ChunkConfig {
                chunk_size: 10,
                overlap: 2,
            },
            batch_size: 2,
        }
    }

    #[tokio::test]
    async fn test_index_document_tags_every_chunk() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "alpha beta gamma delta epsilon zeta",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        let summary = indexer
            .index_document(b"ignored", "doc-1", "My Paper")
            .await
            .unwrap();

        let records = index.records.read().await;
        assert_eq!(summary.chunks_indexed, records.len());
        assert!(summary.chunks_indexed > 0);
        for record in records.iter() {
            assert_eq!(record.metadata.document_id, "doc-1");
            assert_eq!(record.metadata.source, "My Paper");
            assert_eq!(record.vector.len(), TEST_DIM);
            assert_eq!(
                record.metadata.length,
                record.metadata.end - record.metadata.start
            );
            assert!(!record.metadata.text.is_empty());
        }
        assert_eq!(index.ready_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_document_indexes_nothing() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "   \n ",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        let summary = indexer
            .index_document(b"ignored", "doc-1", "Empty")
            .await
            .unwrap();

        assert_eq!(summary.chunks_indexed, 0);
        assert!(index.records.read().await.is_empty());
        // No chunks means the index is never touched
        assert_eq!(index.ready_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_document() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let embedder = Arc::new(CountingEmbedder::new());
        let indexer = DocumentIndexer::new(
            Arc::new(FailingExtractor),
            Arc::new(EmbeddingClient::with_policy(
                Arc::clone(&embedder) as _,
                RetryPolicy::none(),
            )),
            Arc::clone(&index) as _,
            small_chunks(),
        )
        .unwrap();

        let result = indexer.index_document(b"junk", "doc-1", "Broken").await;

        assert!(matches!(result, Err(Error::Extraction(_))));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert!(index.records.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort_remaining() {
        // batch_size 1 puts the poisoned chunk alone in its batch
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "good1 good2 POISON good3",
            Arc::new(PoisonEmbedder { marker: "POISON" }),
            Arc::clone(&index),
            IndexerConfig {
                chunk: ChunkConfig {
                    chunk_size: 5,
                    overlap: 0,
                },
                batch_size: 1,
            },
        );

        let summary = indexer
            .index_document(b"ignored", "doc-1", "Mixed")
            .await
            .unwrap();

        assert_eq!(summary.chunks_indexed, 3);
        let records = index.records.read().await;
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.metadata.text.contains("POISON")));
    }

    #[tokio::test]
    async fn test_reindexing_accumulates_chunks() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "one two three four five six",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        let first = indexer
            .index_document(b"ignored", "doc-1", "Paper")
            .await
            .unwrap();
        let second = indexer
            .index_document(b"ignored", "doc-1", "Paper")
            .await
            .unwrap();

        assert_eq!(first.chunks_indexed, second.chunks_indexed);
        let records = index.records.read().await;
        assert_eq!(records.len(), first.chunks_indexed * 2);

        // Each pass used fresh chunk ids
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[tokio::test]
    async fn test_delete_document_removes_all_chunks() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "a b c d e f g h i j",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        let summary = indexer
            .index_document(b"ignored", "doc-1", "Paper")
            .await
            .unwrap();
        let deleted = indexer.delete_document("doc-1").await.unwrap();

        assert_eq!(deleted as usize, summary.chunks_indexed);
        assert!(index.records.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unindexed_document_is_noop() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "text",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        assert_eq!(indexer.delete_document("never-indexed").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_detached_indexing_completes() {
        let index = Arc::new(RecordingIndex::new(TEST_DIM));
        let indexer = indexer_with(
            "alpha beta gamma",
            Arc::new(CountingEmbedder::new()),
            Arc::clone(&index),
            small_chunks(),
        );

        let handle = indexer.index_document_detached(
            b"ignored".to_vec(),
            "doc-1".to_string(),
            "Paper".to_string(),
        );
        handle.await.unwrap();

        assert!(!index.records.read().await.is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected_at_construction() {
        let embedder = Arc::new(EmbeddingClient::with_policy(
            Arc::new(CountingEmbedder::new()) as _,
            RetryPolicy::none(),
        ));
        let index = Arc::new(RecordingIndex::new(TEST_DIM + 1));

        let result = DocumentIndexer::new(
            Arc::new(StubExtractor {
                text: String::new(),
            }),
            embedder,
            index,
            IndexerConfig::default(),
        );

        assert!(matches!(
            result,
            Err(ConfigError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_chunk_config_rejected_at_construction() {
        let embedder = Arc::new(EmbeddingClient::with_policy(
            Arc::new(CountingEmbedder::new()) as _,
            RetryPolicy::none(),
        ));
        let index = Arc::new(RecordingIndex::new(TEST_DIM));

        let result = DocumentIndexer::new(
            Arc::new(StubExtractor {
                text: String::new(),
            }),
            embedder,
            index,
            IndexerConfig {
                chunk: ChunkConfig {
                    chunk_size: 0,
                    overlap: 0,
                },
                batch_size: 8,
            },
        );

        assert!(matches!(result, Err(ConfigError::InvalidChunkSize(0))));
    }
}
