//! Top-k passage retrieval over a single document.
//!
//! The [`Retriever`] composes the [`WordChunker`], a shared
//! [`EmbeddingProvider`] and a per-call [`FlatL2Index`]:
//! chunk → embed chunks → embed query → index → search.
//!
//! Nothing is cached between calls. Each call builds its own index and drops
//! it on return, so a single `Retriever` can serve concurrent requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use quizlab_rag::{Retriever, RetrieverConfig};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrieverConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .build()?;
//!
//! let passages = retriever.retrieve(&document_text, "photosynthesis", 3).await?;
//! let context = quizlab_rag::join_context(&passages);
//! ```

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::WordChunker;
use crate::config::RetrieverConfig;
use crate::document::{Chunk, RetrievedChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;

/// Separator placed between retrieved passages by [`join_context`].
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Retrieves the chunks of a document nearest to a query in embedding space.
///
/// Construct one via [`Retriever::builder()`] or [`Retriever::new`].
pub struct Retriever {
    config: RetrieverConfig,
    chunker: WordChunker,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl Retriever {
    /// Create a retriever with the default configuration.
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { config: RetrieverConfig::default(), chunker: WordChunker::default(), embedding_provider }
    }

    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retriever configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Split `text` with the configured chunk size.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunker.chunk(text)
    }

    /// Return the texts of the `top_k` chunks of `text` nearest to `query`,
    /// nearest first.
    ///
    /// `top_k` larger than the number of chunks returns every chunk.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] if `text` contains no words.
    /// - [`RagError::EmbeddingError`] if embedding fails, times out, or
    ///   returns malformed vectors.
    /// - [`RagError::ConfigError`] if `top_k` is zero.
    pub async fn retrieve(&self, text: &str, query: &str, top_k: usize) -> Result<Vec<String>> {
        let results = self.retrieve_scored(text, query, top_k).await?;
        Ok(results.into_iter().map(|r| r.text).collect())
    }

    /// Like [`retrieve`](Self::retrieve), but keeps each chunk's index and
    /// distance to the query.
    ///
    /// Results are ordered by ascending distance; equal distances are ordered
    /// by ascending chunk index.
    pub async fn retrieve_scored(
        &self,
        text: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        if top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }

        // 1. Chunk the document
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            error!("retrieval requested for a document with no words");
            return Err(RagError::EmptyCorpus);
        }

        // 2. Embed every chunk, in chunk order
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let chunk_embeddings = self.embed_chunks(&texts).await?;

        // 3. Embed the query with the same model
        let query_embedding = self.embed_query(query).await?;

        // 4. Build a fresh exact index for this call
        let dimensions = query_embedding.len();
        let index = FlatL2Index::from_vectors(dimensions, chunk_embeddings)
            .map_err(|e| self.embedding_error(format!("cannot index chunk embeddings: {e}")))?;

        // 5. Search; the index clamps top_k to the number of chunks
        let neighbors = index
            .search(&query_embedding, top_k)
            .map_err(|e| self.embedding_error(format!("cannot search with query embedding: {e}")))?;

        let results: Vec<RetrievedChunk> = neighbors
            .into_iter()
            .map(|neighbor| {
                let chunk = &chunks[neighbor.position];
                RetrievedChunk {
                    index: chunk.index,
                    text: chunk.text.clone(),
                    distance: neighbor.distance,
                }
            })
            .collect();

        info!(
            chunk_count = chunks.len(),
            top_k,
            result_count = results.len(),
            "retrieval completed"
        );

        Ok(results)
    }

    async fn embed_chunks(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(provider = self.provider_name(), batch_size = texts.len(), "embedding chunks");

        let embeddings = self
            .with_timeout("chunk embedding", self.embedding_provider.embed_batch(texts))
            .await?;

        if embeddings.len() != texts.len() {
            return Err(self.embedding_error(format!(
                "expected {} chunk embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        for (position, embedding) in embeddings.iter().enumerate() {
            self.check_vector(embedding).map_err(|message| {
                self.embedding_error(format!("chunk {position} embedding {message}"))
            })?;
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        debug!(provider = self.provider_name(), query_len = query.len(), "embedding query");

        let embedding =
            self.with_timeout("query embedding", self.embedding_provider.embed(query)).await?;
        self.check_vector(&embedding)
            .map_err(|message| self.embedding_error(format!("query embedding {message}")))?;
        Ok(embedding)
    }

    /// Run an embedding future under the configured timeout, folding every
    /// failure into [`RagError::EmbeddingError`].
    async fn with_timeout<T>(
        &self,
        operation: &str,
        future: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let timeout = self.config.embed_timeout;
        match tokio::time::timeout(timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e @ RagError::EmbeddingError { .. })) => {
                error!(provider = self.provider_name(), operation, error = %e, "embedding failed");
                Err(e)
            }
            Ok(Err(e)) => {
                error!(provider = self.provider_name(), operation, error = %e, "embedding failed");
                Err(self.embedding_error(format!("{operation} failed: {e}")))
            }
            Err(_) => {
                error!(provider = self.provider_name(), operation, ?timeout, "embedding timed out");
                Err(self.embedding_error(format!("{operation} timed out after {timeout:?}")))
            }
        }
    }

    fn check_vector(&self, vector: &[f32]) -> std::result::Result<(), String> {
        let expected = self.embedding_provider.dimensions();
        if vector.len() != expected {
            return Err(format!("has {} dimensions, expected {expected}", vector.len()));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err("contains non-finite values".to_string());
        }
        Ok(())
    }

    fn embedding_error(&self, message: String) -> RagError {
        RagError::embedding(self.provider_name(), message)
    }

    fn provider_name(&self) -> &str {
        self.embedding_provider.name()
    }
}

/// Join retrieved passages into one prompt context block.
pub fn join_context<S: AsRef<str>>(passages: &[S]) -> String {
    passages.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

/// Builder for constructing a [`Retriever`].
///
/// The embedding provider is required; the configuration defaults to
/// [`RetrieverConfig::default()`].
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrieverConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RetrieverBuilder {
    /// Set the retriever configuration.
    pub fn config(mut self, config: RetrieverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build the [`Retriever`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the embedding provider is missing
    /// or the configuration is invalid.
    pub fn build(self) -> Result<Retriever> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let chunker = WordChunker::new(config.chunk_size)?;

        Ok(Retriever { config, chunker, embedding_provider })
    }
}
