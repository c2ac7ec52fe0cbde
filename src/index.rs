//! In-memory flat vector index with exact inner-product search.
//!
//! Vectors are L2-normalized by the embedder, so inner product equals
//! cosine similarity. Search is exhaustive; repository-scale corpora
//! (hundreds to low thousands of chunks) do not need approximate
//! structures, a deliberate simplicity-over-scale tradeoff.

use thiserror::Error;

/// Index id used when fewer than `k` matches exist.
pub const NO_MATCH: i64 = -1;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Result of one top-k search: parallel score/id arrays of length
/// exactly `k`, padded with [`NO_MATCH`] ids when the index holds fewer
/// than `k` vectors. Callers must filter the sentinel before mapping
/// ids back to chunk metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHits {
    pub scores: Vec<f32>,
    pub ids: Vec<i64>,
}

/// Flat (exhaustive) inner-product index over fixed-dimension vectors.
///
/// Append-only within a session: vectors are added in bulk and keep the
/// position they were inserted at as their stable id.
#[derive(Debug)]
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vectors stored.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a batch of vectors. Ids are assigned positionally,
    /// continuing from the current length.
    pub fn add_batch(&mut self, vectors: &[Vec<f32>]) -> Result<(), IndexError> {
        for v in vectors {
            if v.len() != self.dim {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dim,
                    got: v.len(),
                });
            }
        }
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// Exhaustive top-k search by inner product, descending.
    pub fn search(&self, query: &[f32], k: usize) -> Result<SearchHits, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(id, row)| (dot(row, query), id))
            .collect();

        // Descending by score; ties resolved by insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        let mut scores: Vec<f32> = scored.iter().map(|(s, _)| *s).collect();
        let mut ids: Vec<i64> = scored.iter().map(|(_, id)| *id as i64).collect();
        scores.resize(k, f32::NEG_INFINITY);
        ids.resize(k, NO_MATCH);

        Ok(SearchHits { scores, ids })
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dim: usize, axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let mut index = FlatIpIndex::new(3);
        index
            .add_batch(&[unit(3, 0), unit(3, 1), vec![0.6, 0.8, 0.0]])
            .unwrap();

        let hits = index.search(&unit(3, 1), 3).unwrap();
        assert_eq!(hits.ids[0], 1);
        assert_eq!(hits.ids[1], 2);
        assert_eq!(hits.ids[2], 0);
        assert!(hits.scores[0] >= hits.scores[1]);
        assert!(hits.scores[1] >= hits.scores[2]);
    }

    #[test]
    fn test_search_pads_with_sentinel() {
        let mut index = FlatIpIndex::new(2);
        index.add_batch(&[vec![1.0, 0.0]]).unwrap();

        let hits = index.search(&[1.0, 0.0], 4).unwrap();
        assert_eq!(hits.ids.len(), 4);
        assert_eq!(hits.scores.len(), 4);
        assert_eq!(hits.ids[0], 0);
        assert_eq!(&hits.ids[1..], &[NO_MATCH, NO_MATCH, NO_MATCH]);
    }

    #[test]
    fn test_search_empty_index() {
        let index = FlatIpIndex::new(2);
        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert!(hits.ids.iter().all(|&id| id == NO_MATCH));
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let mut index = FlatIpIndex::new(3);
        let err = index.add_batch(&[vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let index = FlatIpIndex::new(3);
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_ids_are_stable_across_batches() {
        let mut index = FlatIpIndex::new(2);
        index.add_batch(&[vec![1.0, 0.0]]).unwrap();
        index.add_batch(&[vec![0.0, 1.0]]).unwrap();
        assert_eq!(index.len(), 2);

        let hits = index.search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(hits.ids[0], 1);
    }
}
