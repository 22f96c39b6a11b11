//! HTTP embedding provider.
//!
//! Speaks the OpenAI-compatible embeddings API: a POST with
//! `{"input": [...], "model": "..."}` returning one vector per input under
//! `data[].embedding`. Gemini and other providers expose the same surface
//! behind a compatibility endpoint.

use async_trait::async_trait;
use docrag_core::{EmbedError, Embedder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Construction-time configuration for [`HttpEmbedder`].
#[derive(Debug, Clone, Deserialize)]
pub struct HttpEmbedderConfig {
    /// Full URL of the embeddings endpoint
    pub endpoint: String,
    /// Bearer token for the provider
    pub api_key: String,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Expected vector dimension; vectors of any other width are rejected
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_model() -> String {
    "text-embedding-004".to_string()
}

fn default_dimension() -> usize {
    768
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Remote embedding provider over HTTP.
///
/// One provider call per `embed` invocation; retry lives in
/// [`EmbeddingClient`](crate::EmbeddingClient).
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    /// Create a provider from its configuration.
    #[must_use]
    pub fn new(config: HttpEmbedderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        debug!("embedding {} texts via {}", texts.len(), self.config.model);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingsRequest {
                input: texts,
                model: &self.config.model,
            })
            .send()
            .await
            .map_err(|e| EmbedError::Provider(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| EmbedError::Provider(format!("provider returned error: {e}")))?;

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Provider(format!("invalid response body: {e}")))?;

        let vectors: Vec<Vec<f32>> = body.data.into_iter().map(|d| d.embedding).collect();
        for vector in &vectors {
            if vector.len() != self.config.dimension {
                return Err(EmbedError::Dimension {
                    expected: self.config.dimension,
                    got: vector.len(),
                });
            }
        }

        Ok(vectors)
    }
}
