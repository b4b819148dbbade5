//! Error types for the `quizlab-rag` crate.

use thiserror::Error;

/// Errors that can occur while chunking, embedding, indexing or retrieving.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding backend was unavailable, timed out, or returned
    /// malformed output (wrong vector count, wrong dimension, non-finite values).
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The document produced no chunks, so there is nothing to index.
    #[error("Empty corpus: document text contains no words")]
    EmptyCorpus,

    /// A vector was rejected by the similarity index.
    #[error("Index error: {0}")]
    IndexError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    /// Build an [`RagError::EmbeddingError`] for the given provider name.
    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
