//! Embedding client wrapping a provider with retry and batch postconditions.

use docrag_core::{EmbedError, Embedder};
use std::sync::Arc;
use tracing::warn;

use crate::retry::RetryPolicy;

/// Client for an embedding provider.
///
/// Wraps any [`Embedder`] with the guarantees the pipeline relies on:
///
/// - an empty input batch fails fast without contacting the provider;
/// - provider failures are retried up to the policy's attempt bound, with
///   a pause between attempts; exhaustion surfaces the last cause;
/// - a successful response must contain exactly one vector per input, or
///   the call fails rather than returning partial results.
pub struct EmbeddingClient {
    provider: Arc<dyn Embedder>,
    policy: RetryPolicy,
}

impl EmbeddingClient {
    /// Create a client with the default retry policy.
    pub fn new(provider: Arc<dyn Embedder>) -> Self {
        Self::with_policy(provider, RetryPolicy::default())
    }

    /// Create a client with an explicit retry policy.
    pub fn with_policy(provider: Arc<dyn Embedder>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Embedding dimension of the underlying provider.
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Model identifier of the underlying provider.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Embed a batch of texts, one vector per input in the same order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let mut last_err: Option<EmbedError> = None;
        for attempt in 1..=self.policy.max_attempts {
            match self.provider.embed(texts).await {
                Ok(vectors) => {
                    if vectors.len() != texts.len() {
                        return Err(EmbedError::CountMismatch {
                            expected: texts.len(),
                            got: vectors.len(),
                        });
                    }
                    return Ok(vectors);
                }
                Err(e) => {
                    warn!("embedding request failed (attempt {attempt}): {e}");
                    last_err = Some(e);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        let cause = last_err
            .unwrap_or_else(|| EmbedError::Provider("no attempts were made".to_string()));
        Err(EmbedError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            source: Box::new(cause),
        })
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self.embed(&[query.to_string()]).await?;
        vectors.pop().ok_or(EmbedError::CountMismatch {
            expected: 1,
            got: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TEST_DIM: usize = 8;

    /// Mock provider that fails a configurable number of times before
    /// succeeding, counting every call.
    struct FlakyProvider {
        failures: usize,
        calls: AtomicUsize,
    }

    impl FlakyProvider {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for FlakyProvider {
        fn model_name(&self) -> &str {
            "flaky"
        }

        fn dimension(&self) -> usize {
            TEST_DIM
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(EmbedError::Provider(format!("transient failure {call}")));
            }
            Ok(texts.iter().map(|_| vec![0.5; TEST_DIM]).collect())
        }
    }

    /// Mock provider that returns fewer vectors than inputs.
    struct ShortProvider;

    #[async_trait]
    impl Embedder for ShortProvider {
        fn model_name(&self) -> &str {
            "short"
        }

        fn dimension(&self) -> usize {
            TEST_DIM
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts
                .iter()
                .skip(1)
                .map(|_| vec![0.0; TEST_DIM])
                .collect())
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    fn inputs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text {i}")).collect()
    }

    #[tokio::test]
    async fn test_empty_batch_fails_without_provider_call() {
        let provider = Arc::new(FlakyProvider::new(0));
        let client = EmbeddingClient::with_policy(Arc::clone(&provider) as _, fast_policy(3));

        let result = client.embed(&[]).await;

        assert!(matches!(result, Err(EmbedError::EmptyBatch)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_strings_are_valid_content() {
        // Distinct from the empty-batch precondition: a batch of empty
        // strings is a normal provider request.
        let provider = Arc::new(FlakyProvider::new(0));
        let client = EmbeddingClient::with_policy(Arc::clone(&provider) as _, fast_policy(3));

        let vectors = client
            .embed(&[String::new(), String::new()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_one_vector_per_input() {
        let provider = Arc::new(FlakyProvider::new(0));
        let client = EmbeddingClient::with_policy(provider as _, fast_policy(3));

        let vectors = client.embed(&inputs(5)).await.unwrap();

        assert_eq!(vectors.len(), 5);
        assert!(vectors.iter().all(|v| v.len() == TEST_DIM));
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let provider = Arc::new(FlakyProvider::new(2));
        let client = EmbeddingClient::with_policy(Arc::clone(&provider) as _, fast_policy(3));

        let vectors = client.embed(&inputs(2)).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_cause() {
        let provider = Arc::new(FlakyProvider::new(usize::MAX));
        let client = EmbeddingClient::with_policy(Arc::clone(&provider) as _, fast_policy(3));

        let result = client.embed(&inputs(1)).await;

        assert_eq!(provider.calls(), 3);
        match result {
            Err(EmbedError::RetriesExhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("transient failure 2"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_results_are_an_error() {
        let client = EmbeddingClient::with_policy(Arc::new(ShortProvider) as _, fast_policy(3));

        let result = client.embed(&inputs(3)).await;

        assert!(matches!(
            result,
            Err(EmbedError::CountMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_embed_query_returns_single_vector() {
        let provider = Arc::new(FlakyProvider::new(0));
        let client = EmbeddingClient::with_policy(provider as _, fast_policy(3));

        let vector = client.embed_query("what is this about?").await.unwrap();

        assert_eq!(vector.len(), TEST_DIM);
    }

    #[tokio::test]
    async fn test_dimension_and_model_name_pass_through() {
        let client = EmbeddingClient::new(Arc::new(FlakyProvider::new(0)) as _);
        assert_eq!(client.dimension(), TEST_DIM);
        assert_eq!(client.model_name(), "flaky");
    }
}
