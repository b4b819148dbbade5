//! Data types for chunks and retrieval results.

use serde::{Deserialize, Serialize};

/// A contiguous word span of a document.
///
/// `index` is the chunk's position within the document, starting at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk within the source document.
    pub index: usize,
    /// The chunk's words joined with single spaces.
    pub text: String,
}

/// A [`Chunk`] returned by retrieval, paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    /// Position of the chunk within the source document.
    pub index: usize,
    /// The chunk text.
    pub text: String,
    /// Euclidean distance between the chunk embedding and the query embedding
    /// (lower is more relevant).
    pub distance: f32,
}
