//! Retrieval-grounded quiz generation.
//!
//! [`QuizGenerator`] ties the pieces together: check the document length,
//! retrieve the passages nearest to the request's query, build the prompt,
//! then call the model and parse its reply, retrying failed attempts.
//!
//! Retrieval runs once per `generate` call. Only model and parse failures are
//! retried; retrieval failures are returned as they are.
//!
//! # Example
//!
//! ```rust,ignore
//! use quizlab_gen::{QuizGenerator, QuizRequest, Difficulty, QuestionType};
//!
//! let generator = QuizGenerator::new(retriever, model);
//! let request = QuizRequest::new(5, Difficulty::Medium, QuestionType::Mcq);
//! let questions = generator.generate(&text, &request).await?;
//! ```

use std::sync::Arc;

use quizlab_rag::{Retriever, join_context, word_count};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GenError, Result};
use crate::model::{ChatMessage, LanguageModel};
use crate::prompt::build_messages;
use crate::question::{Question, parse_questions};
use crate::request::QuizRequest;

/// Settings for [`QuizGenerator`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Model calls per `generate` before giving up.
    pub max_attempts: usize,
    /// Documents with fewer words are rejected before retrieval.
    pub min_words: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { max_attempts: 3, min_words: 50 }
    }
}

impl GeneratorConfig {
    /// # Errors
    ///
    /// Returns [`GenError::ConfigError`] if `max_attempts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(GenError::ConfigError("max_attempts must be at least one".into()));
        }
        Ok(())
    }
}

/// Generates quiz questions from a document.
pub struct QuizGenerator {
    retriever: Arc<Retriever>,
    model: Arc<dyn LanguageModel>,
    config: GeneratorConfig,
}

impl QuizGenerator {
    /// Create a generator with the default configuration.
    pub fn new(retriever: Arc<Retriever>, model: Arc<dyn LanguageModel>) -> Self {
        Self { retriever, model, config: GeneratorConfig::default() }
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// See [`GeneratorConfig::validate`].
    pub fn with_config(mut self, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    /// Retrieve the passages for `request` and join them into a context block.
    pub async fn build_context(&self, text: &str, request: &QuizRequest) -> Result<String> {
        let query = request.retrieval_query();
        let top_k = self.retriever.config().top_k;
        let passages = self.retriever.retrieve(text, &query, top_k).await?;
        Ok(join_context(&passages))
    }

    /// Generate questions for `request` from `text`.
    ///
    /// # Errors
    ///
    /// - [`GenError::ConfigError`] for an invalid request.
    /// - [`GenError::DocumentTooShort`] below `min_words`.
    /// - [`GenError::Retrieval`] if retrieval fails.
    /// - [`GenError::AttemptsExhausted`] when every model attempt fails.
    pub async fn generate(&self, text: &str, request: &QuizRequest) -> Result<Vec<Question>> {
        request.validate()?;

        let words = word_count(text);
        if words < self.config.min_words {
            return Err(GenError::DocumentTooShort { words, minimum: self.config.min_words });
        }

        let context = self.build_context(text, request).await?;
        let messages = build_messages(request, &context);

        let max_attempts = self.config.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(&messages).await {
                Ok(questions) => {
                    if questions.len() != request.num_questions {
                        warn!(
                            requested = request.num_questions,
                            received = questions.len(),
                            "model returned a different number of questions"
                        );
                    }
                    info!(
                        model = self.model.name(),
                        attempt,
                        question_count = questions.len(),
                        "quiz generated"
                    );
                    return Ok(questions);
                }
                Err(e @ (GenError::Model { .. } | GenError::MalformedResponse(_))) => {
                    warn!(attempt, max_attempts, error = %e, "generation attempt failed, retrying");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let last_error = last_error
            .unwrap_or_else(|| GenError::ConfigError("max_attempts must be at least one".into()));
        Err(GenError::AttemptsExhausted { attempts: max_attempts, last_error: Box::new(last_error) })
    }

    async fn attempt(&self, messages: &[ChatMessage]) -> Result<Vec<Question>> {
        let reply = self.model.complete(messages).await?;
        parse_questions(&reply)
    }
}
