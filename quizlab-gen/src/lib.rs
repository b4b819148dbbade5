//! # quizlab-gen
//!
//! Quiz question generation grounded in retrieved document passages.
//!
//! The pieces, in the order [`QuizGenerator`] uses them:
//!
//! - [`QuizRequest`]: count, [`Difficulty`] and [`QuestionType`], plus the
//!   retrieval query derived from them
//! - [`prompt`]: system and user messages around the retrieved context
//! - [`LanguageModel`]: the chat-completion seam, with an OpenRouter client
//!   behind the `openrouter` feature
//! - [`question`]: repair and parsing of the model's JSON reply

pub mod error;
pub mod generator;
pub mod model;
#[cfg(feature = "openrouter")]
pub mod openrouter;
pub mod prompt;
pub mod question;
pub mod request;

pub use error::{GenError, Result};
pub use generator::{GeneratorConfig, QuizGenerator};
pub use model::{ChatMessage, LanguageModel, Role};
pub use question::{Question, parse_questions};
pub use request::{Difficulty, QuestionType, QuizRequest};
