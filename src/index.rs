//! Exact k-nearest-neighbor index over embedding vectors.
//!
//! Vectors are addressed by insertion position. Queries scan every stored vector,
//! rank by squared Euclidean distance, and break ties by lower position.

use crate::error::{DimensionMismatch, IndexError};

/// A ranked match: insertion position and squared distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Immutable brute-force vector index. All vectors share one dimensionality,
/// fixed by the first vector added.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from vectors in insertion order.
    ///
    /// An empty input yields a degenerate index that answers every query with
    /// no results.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, DimensionMismatch> {
        let dimensions = vectors.first().map_or(0, Vec::len);
        if let Some((position, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(DimensionMismatch {
                position,
                expected: dimensions,
                actual: v.len(),
            });
        }
        Ok(Self {
            dimensions,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality of stored vectors (0 for an empty index).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `min(k, len)` nearest stored vectors, nearest first.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }
        if k == 0 {
            return Err(IndexError::InvalidArgument(
                "k must be a positive integer".into(),
            ));
        }
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        let mut ranked: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, stored)| Neighbor {
                position,
                distance: squared_euclidean(vector, stored),
            })
            .collect();

        // Stable sort: equal distances keep insertion order.
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(k);
        Ok(ranked)
    }
}

/// Sum of squared per-dimension differences. Callers guarantee equal lengths.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
