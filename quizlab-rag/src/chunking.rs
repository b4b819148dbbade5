//! Word-count document chunking.
//!
//! Text is split on whitespace and regrouped into consecutive, non-overlapping
//! chunks of a fixed number of words. The last chunk holds whatever is left
//! over. Original whitespace (paragraph breaks, indentation) is not preserved.

use std::num::NonZeroUsize;

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// Number of words per chunk when the caller does not choose one.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

const DEFAULT_CHUNK_WORDS: NonZeroUsize = NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap();

/// Splits text into chunks of `chunk_size` words.
///
/// # Example
///
/// ```rust
/// use quizlab_rag::WordChunker;
///
/// let chunker = WordChunker::new(3).unwrap();
/// let chunks = chunker.split("one two three four five");
/// assert_eq!(chunks, vec!["one two three", "four five"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordChunker {
    chunk_size: NonZeroUsize,
}

impl WordChunker {
    /// Create a chunker producing chunks of `chunk_size` words.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self> {
        let chunk_size = NonZeroUsize::new(chunk_size)
            .ok_or_else(|| RagError::ConfigError("chunk_size must be greater than zero".into()))?;
        Ok(Self { chunk_size })
    }

    /// Number of words per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Split `text` into indexed chunks.
    ///
    /// Returns an empty `Vec` if `text` contains no words.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { index, text })
            .collect()
    }

    /// Split `text` into chunk strings without position bookkeeping.
    pub fn split(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.chunk_size)
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_WORDS }
    }
}

/// Split `text` on whitespace and join every `chunk_size` words with single spaces.
pub fn chunk_text(text: &str, chunk_size: NonZeroUsize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(chunk_size.get()).map(|window| window.join(" ")).collect()
}

/// Count the whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn empty_and_blank_text_yield_no_chunks() {
        let chunker = WordChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk(" \n\t  ").is_empty());
    }

    #[test]
    fn six_hundred_words_make_three_full_chunks() {
        let chunks = WordChunker::default().chunk(&words(600));
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(word_count(&chunk.text), 200);
        }
        assert!(chunks[1].text.starts_with("w200 "));
    }

    #[test]
    fn remainder_lands_in_last_chunk() {
        let chunks = WordChunker::new(4).unwrap().split(&words(10));
        assert_eq!(chunks, vec!["w0 w1 w2 w3", "w4 w5 w6 w7", "w8 w9"]);
    }

    #[test]
    fn whitespace_structure_is_collapsed() {
        let chunks = WordChunker::new(10).unwrap().split("alpha\n\n  beta\tgamma \r\n delta");
        assert_eq!(chunks, vec!["alpha beta gamma delta"]);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(WordChunker::new(0), Err(RagError::ConfigError(_))));
    }

    #[test]
    fn default_uses_two_hundred_words() {
        assert_eq!(WordChunker::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }
}
