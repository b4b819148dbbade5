//! Exact nearest-neighbour index using Euclidean (L2) distance.
//!
//! [`FlatL2Index`] stores vectors in insertion order and answers queries with
//! a linear scan. There is no approximation or quantisation. At a few hundred
//! vectors per document the scan is negligible next to embedding cost.

use std::cmp::Ordering;

use crate::error::{RagError, Result};

/// A vector returned by [`FlatL2Index::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position of the vector in the index.
    pub position: usize,
    /// Euclidean distance from the query.
    pub distance: f32,
}

/// A flat (brute-force) index over fixed-dimension vectors.
///
/// # Example
///
/// ```rust
/// use quizlab_rag::FlatL2Index;
///
/// let mut index = FlatL2Index::new(2);
/// index.add(vec![0.0, 0.0]).unwrap();
/// index.add(vec![3.0, 4.0]).unwrap();
///
/// let hits = index.search(&[3.0, 3.0], 1).unwrap();
/// assert_eq!(hits[0].position, 1);
/// assert_eq!(hits[0].distance, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of `dimensions` components.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, vectors: Vec::new() }
    }

    /// Build an index from `vectors`, which must all have `dimensions` components.
    pub fn from_vectors(dimensions: usize, vectors: Vec<Vec<f32>>) -> Result<Self> {
        let mut index = Self { dimensions, vectors: Vec::with_capacity(vectors.len()) };
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Dimensionality accepted by this index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append a vector and return its position.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if the vector has the wrong dimension.
    pub fn add(&mut self, vector: Vec<f32>) -> Result<usize> {
        self.check_dimensions(&vector)?;
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    /// Return the `k` stored vectors nearest to `query`, nearest first.
    ///
    /// `k` is clamped to [`len`](Self::len). Equal distances are ordered by
    /// ascending insertion position.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if `query` has the wrong dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dimensions(query)?;

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (l2_distance(vector, query), position))
            .collect();

        scored.sort_by(|a, b| compare_candidates(*a, *b));
        scored.truncate(k.min(self.vectors.len()));

        Ok(scored.into_iter().map(|(distance, position)| Neighbor { position, distance }).collect())
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(RagError::IndexError(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                vector.len()
            )));
        }
        Ok(())
    }
}

fn compare_candidates(a: (f32, usize), b: (f32, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Squared Euclidean distance.
pub fn squared_l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean distance between two vectors of equal length.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2_distance(a, b).sqrt()
}
