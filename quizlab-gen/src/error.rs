//! Error types for the `quizlab-gen` crate.

use quizlab_rag::RagError;
use thiserror::Error;

/// Errors that can occur while generating a quiz.
#[derive(Debug, Error)]
pub enum GenError {
    /// Passage retrieval failed. Never retried.
    #[error(transparent)]
    Retrieval(#[from] RagError),

    /// The language model call failed (transport, auth, API error).
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The model answered, but not with a usable question list.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// The document is too short to generate questions from.
    #[error("Document is too short: {words} words, at least {minimum} required")]
    DocumentTooShort {
        /// Words found in the document.
        words: usize,
        /// Minimum accepted word count.
        minimum: usize,
    },

    /// A configuration or request validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Every generation attempt failed.
    #[error("Generation failed after {attempts} attempt(s): {last_error}")]
    AttemptsExhausted {
        /// Number of attempts made.
        attempts: usize,
        /// The error from the final attempt.
        last_error: Box<GenError>,
    },
}

impl GenError {
    /// Build a [`GenError::Model`] for the given provider name.
    pub fn model(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model { provider: provider.into(), message: message.into() }
    }
}

/// A convenience result type for generation operations.
pub type Result<T> = std::result::Result<T, GenError>;
