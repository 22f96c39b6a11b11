//! Remote vector-index adapter.
//!
//! Speaks a Pinecone-style JSON API: namespace creation, batched upsert,
//! filtered query, and delete-by-metadata-filter. Provider response shapes
//! vary across versions, so everything a query returns passes through one
//! translation point ([`match_from_value`]) before the rest of the system
//! sees it.

use async_trait::async_trait;
use docrag_core::{
    ChunkMetadata, EmbeddingRecord, IndexError, RetrievalMatch, SimilarityMetric, VectorIndex,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Construction-time configuration for [`RestIndex`].
#[derive(Debug, Clone, Deserialize)]
pub struct RestIndexConfig {
    /// Base URL of the index's data plane
    pub endpoint: String,
    /// Provider API key
    pub api_key: String,
    /// Index (namespace) name
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Vector dimension the index is created with
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Similarity metric the index is created with
    #[serde(default)]
    pub metric: SimilarityMetric,
}

fn default_index_name() -> String {
    "docrag".to_string()
}

fn default_dimension() -> usize {
    768
}

/// Remote vector index over HTTP.
pub struct RestIndex {
    client: reqwest::Client,
    config: RestIndexConfig,
}

impl RestIndex {
    /// Create an adapter from its configuration.
    #[must_use]
    pub fn new(config: RestIndexConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn metric_name(&self) -> &'static str {
        match self.config.metric {
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Dot => "dotproduct",
        }
    }
}

/// Translate one provider match object into a [`RetrievalMatch`].
///
/// Tolerates the shapes seen across provider versions: `score` at the top
/// level or nested under `payload`, and metadata partially populated or
/// absent. Returns `None` only when the match has no id, which makes it
/// unusable.
fn match_from_value(value: &Value) -> Option<RetrievalMatch> {
    let id = value.get("id")?.as_str()?.to_string();

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .or_else(|| {
            value
                .get("payload")
                .and_then(|p| p.get("score"))
                .and_then(Value::as_f64)
        })
        .unwrap_or(0.0) as f32;

    let metadata = value
        .get("metadata")
        .map(metadata_from_value)
        .unwrap_or_default();

    Some(RetrievalMatch {
        id,
        score,
        metadata,
    })
}

/// Rebuild [`ChunkMetadata`] from a provider metadata object. Providers
/// return numbers as floats and may omit fields entirely.
fn metadata_from_value(value: &Value) -> ChunkMetadata {
    ChunkMetadata {
        text: str_field(value, "text"),
        document_id: str_field(value, "document_id"),
        source: str_field(value, "source"),
        start: num_field(value, "start"),
        end: num_field(value, "end"),
        length: num_field(value, "length"),
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn num_field(value: &Value, key: &str) -> usize {
    let field = value.get(key);
    field
        .and_then(Value::as_u64)
        .or_else(|| field.and_then(Value::as_f64).map(|f| f as u64))
        .unwrap_or(0) as usize
}

/// Pull the match list out of a query response body. Some provider
/// versions wrap it in a `result` object.
fn matches_from_body(body: &Value) -> Vec<RetrievalMatch> {
    let matches = body
        .get("matches")
        .or_else(|| body.get("result").and_then(|r| r.get("matches")));

    matches
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(match_from_value).collect())
        .unwrap_or_default()
}

#[async_trait]
impl VectorIndex for RestIndex {
    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn ensure_ready(&self) -> Result<(), IndexError> {
        let response = self
            .client
            .post(self.url("indexes"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "name": self.config.index_name,
                "dimension": self.config.dimension,
                "metric": self.metric_name(),
            }))
            .send()
            .await
            .map_err(|e| IndexError::Init(format!("create request failed: {e}")))?;

        // Conflict means the index already exists; creation is idempotent.
        if response.status() == reqwest::StatusCode::CONFLICT {
            debug!("index {} already exists", self.config.index_name);
            return Ok(());
        }

        response
            .error_for_status()
            .map_err(|e| IndexError::Init(format!("create failed: {e}")))?;
        info!("created index {}", self.config.index_name);
        Ok(())
    }

    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<(), IndexError> {
        let vectors: Vec<Value> = records
            .iter()
            .map(|r| {
                Ok(json!({
                    "id": r.id,
                    "values": r.vector,
                    "metadata": serde_json::to_value(&r.metadata)
                        .map_err(|e| IndexError::Upsert(format!("metadata encode: {e}")))?,
                }))
            })
            .collect::<Result<_, IndexError>>()?;

        self.client
            .post(self.url("vectors/upsert"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "vectors": vectors }))
            .send()
            .await
            .map_err(|e| IndexError::Upsert(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| IndexError::Upsert(format!("provider returned error: {e}")))?;

        debug!("upserted {} vectors", records.len());
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        document_id: Option<&str>,
    ) -> Result<Vec<RetrievalMatch>, IndexError> {
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if let Some(id) = document_id {
            body["filter"] = json!({ "document_id": id });
        }

        let response: Value = self
            .client
            .post(self.url("query"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Query(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| IndexError::Query(format!("provider returned error: {e}")))?
            .json()
            .await
            .map_err(|e| IndexError::Query(format!("invalid response body: {e}")))?;

        Ok(matches_from_body(&response))
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<u64, IndexError> {
        let response: Value = self
            .client
            .post(self.url("vectors/delete"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "filter": { "document_id": document_id } }))
            .send()
            .await
            .map_err(|e| IndexError::Delete(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| IndexError::Delete(format!("provider returned error: {e}")))?
            .json()
            .await
            .unwrap_or(Value::Null);

        // Providers do not consistently report how many vectors went away.
        let deleted = response
            .get("deleted")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        debug!("deleted records for document {document_id}");
        Ok(deleted)
    }
}
