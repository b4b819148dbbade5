//! Configuration for the retriever.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chunking::DEFAULT_CHUNK_SIZE;
use crate::error::{RagError, Result};

/// Default number of chunks returned per retrieval.
pub const DEFAULT_TOP_K: usize = 3;

/// Default upper bound on a single embedding call.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration parameters for the [`Retriever`](crate::Retriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrieverConfig {
    /// Number of words per chunk.
    pub chunk_size: usize,
    /// Number of chunks returned by [`retrieve`](crate::Retriever::retrieve).
    pub top_k: usize,
    /// Maximum time to wait for each embedding call before failing.
    pub embed_timeout: Duration,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }
}

impl RetrieverConfig {
    /// Create a new builder for constructing a [`RetrieverConfig`].
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_size == 0`
    /// - `top_k == 0`
    /// - `embed_timeout` is zero
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.embed_timeout.is_zero() {
            return Err(RagError::ConfigError("embed_timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RetrieverConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    /// Set the number of words per chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the number of chunks to return.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the per-call embedding timeout.
    pub fn embed_timeout(mut self, timeout: Duration) -> Self {
        self.config.embed_timeout = timeout;
        self
    }

    /// Build the [`RetrieverConfig`], validating the parameters.
    ///
    /// # Errors
    ///
    /// See [`RetrieverConfig::validate`].
    pub fn build(self) -> Result<RetrieverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
