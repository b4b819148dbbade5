//! # quizlab-rag
//!
//! Passage retrieval for QuizLab question generation.
//!
//! A document is split into fixed-size word chunks, every chunk and the query
//! are embedded with one shared sentence-embedding model, and an exact L2
//! index built for that single call returns the nearest chunks.
//!
//! ## Features
//!
//! - **Word chunking**: [`WordChunker`], 200 words per chunk by default
//! - **Pluggable embeddings**: the [`EmbeddingProvider`] trait, with an
//!   OpenAI-compatible HTTP backend behind the `http` feature
//! - **Exact search**: [`FlatL2Index`], deterministic tie-breaking by chunk index
//! - **Bounded calls**: every embedding request runs under a timeout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quizlab_rag::{Retriever, join_context};
//! use quizlab_rag::http::{HttpEmbeddingConfig, HttpEmbeddingProvider};
//!
//! let provider = Arc::new(HttpEmbeddingProvider::new(HttpEmbeddingConfig::from_env()?)?);
//! let retriever = Retriever::new(provider);
//! let passages = retriever.retrieve(&text, "Generate 5 MCQ questions", 3).await?;
//! let context = join_context(&passages);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod index;
pub mod retriever;

pub use chunking::{DEFAULT_CHUNK_SIZE, WordChunker, chunk_text, word_count};
pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use document::{Chunk, RetrievedChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{FlatL2Index, Neighbor, l2_distance, squared_l2_distance};
pub use retriever::{CONTEXT_SEPARATOR, Retriever, RetrieverBuilder, join_context};
