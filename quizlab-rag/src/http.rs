//! Sentence-embedding provider speaking the OpenAI-compatible embeddings API.
//!
//! Local sentence-transformer servers (text-embeddings-inference, infinity,
//! llama.cpp, vLLM) expose `POST {base_url}/embeddings`; this provider talks to
//! any of them. It is only available when the `http` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default embeddings server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";

/// The default sentence-embedding model.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// The dimensionality of `all-MiniLM-L6-v2`.
pub const DEFAULT_DIMENSIONS: usize = 384;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER: &str = "http";

/// Connection settings for [`HttpEmbeddingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpEmbeddingConfig {
    /// Base URL; `/embeddings` is appended.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Expected vector length.
    pub dimensions: usize,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Transport-level request timeout.
    pub request_timeout: Duration,
}

impl Default for HttpEmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl HttpEmbeddingConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `QUIZLAB_EMBEDDING_URL` | `base_url` |
    /// | `QUIZLAB_EMBEDDING_MODEL` | `model` |
    /// | `QUIZLAB_EMBEDDING_DIMENSIONS` | `dimensions` |
    /// | `QUIZLAB_EMBEDDING_API_KEY` | `api_key` |
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("QUIZLAB_EMBEDDING_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("QUIZLAB_EMBEDDING_MODEL") {
            config.model = model;
        }
        if let Ok(dims) = std::env::var("QUIZLAB_EMBEDDING_DIMENSIONS") {
            config.dimensions = dims.parse().map_err(|_| {
                RagError::ConfigError(format!("QUIZLAB_EMBEDDING_DIMENSIONS is not a number: {dims}"))
            })?;
        }
        config.api_key = std::env::var("QUIZLAB_EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty());
        Ok(config)
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use quizlab_rag::http::{HttpEmbeddingConfig, HttpEmbeddingProvider};
///
/// let provider = HttpEmbeddingProvider::new(HttpEmbeddingConfig::from_env()?)?;
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), 384);
/// ```
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    config: HttpEmbeddingConfig,
    endpoint: String,
}

impl HttpEmbeddingProvider {
    /// Create a provider from the given configuration.
    pub fn new(config: HttpEmbeddingConfig) -> Result<Self> {
        if config.dimensions == 0 {
            return Err(RagError::ConfigError("embedding dimensions must be non-zero".into()));
        }
        if config.model.is_empty() {
            return Err(RagError::ConfigError("embedding model must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RagError::embedding(PROVIDER, format!("failed to build client: {e}")))?;
        let endpoint = config.endpoint();

        Ok(Self { client, config, endpoint })
    }

    /// Return the provider configuration.
    pub fn config(&self) -> &HttpEmbeddingConfig {
        &self.config
    }
}

// ── Embeddings API request/response types ──────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Put response rows back into input order and check their shape.
fn order_embeddings(
    mut data: Vec<EmbeddingData>,
    expected_count: usize,
    dimensions: usize,
) -> std::result::Result<Vec<Vec<f32>>, String> {
    if data.len() != expected_count {
        return Err(format!("expected {expected_count} embeddings, got {}", data.len()));
    }

    let indexed = data.iter().filter(|d| d.index.is_some()).count();
    if indexed == data.len() {
        data.sort_by_key(|d| d.index);
        let in_range = data.iter().enumerate().all(|(i, d)| d.index == Some(i));
        if !in_range {
            return Err("response indices do not cover the request inputs".to_string());
        }
    } else if indexed > 0 {
        return Err(format!("only {indexed} of {} response rows carry an index", data.len()));
    }

    data.into_iter()
        .map(|d| {
            if d.embedding.len() == dimensions {
                Ok(d.embedding)
            } else {
                Err(format!("embedding has {} dimensions, expected {dimensions}", d.embedding.len()))
            }
        })
        .collect()
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::embedding(PROVIDER, "API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.config.model,
            "embedding batch"
        );

        let request_body = EmbeddingRequest { model: &self.config.model, input: texts };

        let mut request = self.client.post(&self.endpoint).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, endpoint = %self.endpoint, error = %e, "request failed");
            RagError::embedding(PROVIDER, format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::embedding(PROVIDER, format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            RagError::embedding(PROVIDER, format!("failed to parse response: {e}"))
        })?;

        order_embeddings(embedding_response.data, texts.len(), self.config.dimensions)
            .map_err(|message| RagError::embedding(PROVIDER, message))
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: Option<usize>, embedding: Vec<f32>) -> EmbeddingData {
        EmbeddingData { index, embedding }
    }

    #[test]
    fn endpoint_appends_embeddings_path() {
        let config = HttpEmbeddingConfig {
            base_url: "http://embed.local/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "http://embed.local/v1/embeddings");
    }

    #[test]
    fn rows_are_reordered_by_index() {
        let data = vec![row(Some(1), vec![2.0]), row(Some(0), vec![1.0])];
        assert_eq!(order_embeddings(data, 2, 1).unwrap(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn rows_without_index_keep_response_order() {
        let data = vec![row(None, vec![5.0]), row(None, vec![6.0])];
        assert_eq!(order_embeddings(data, 2, 1).unwrap(), vec![vec![5.0], vec![6.0]]);
    }

    #[test]
    fn partially_indexed_rows_are_rejected() {
        let data = vec![row(Some(1), vec![2.0]), row(None, vec![1.0])];
        let err = order_embeddings(data, 2, 1).unwrap_err();
        assert!(err.contains("1 of 2"));
    }

    #[test]
    fn wrong_count_or_dimension_is_rejected() {
        assert!(order_embeddings(vec![row(Some(0), vec![1.0])], 2, 1).is_err());
        assert!(order_embeddings(vec![row(Some(0), vec![1.0, 2.0])], 1, 1).is_err());
        assert!(order_embeddings(vec![row(Some(3), vec![1.0])], 1, 1).is_err());
    }

    #[test]
    fn response_json_parses() {
        let body = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.5,-0.5]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.5, -0.5]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = HttpEmbeddingConfig { dimensions: 0, ..Default::default() };
        assert!(matches!(HttpEmbeddingProvider::new(config), Err(RagError::ConfigError(_))));
    }
}
