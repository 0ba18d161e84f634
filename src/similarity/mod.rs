//! Collaborative-filtering similarity index.
//!
//! Pairs the [`PivotIndex`] (title order) with the [`SimilarityMatrix`] whose rows
//! follow that order. Both come out of the offline training job and are frozen.

pub mod error;
pub mod matrix;
pub mod pivot;


pub use error::{SimilarityError, SimilarityResult};
pub use matrix::{ScoredIndex, SimilarityMatrix};
pub use pivot::PivotIndex;

use std::sync::atomic::{AtomicU64, Ordering};

/// A neighbouring pivot title and its similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarTitle<'a> {
    pub title: &'a str,
    pub score: f32,
}

/// Pivot titles plus their similarity matrix.
pub struct SimilarityIndex {
    pivot: PivotIndex,
    matrix: SimilarityMatrix,
    lookups: AtomicU64,
}

impl SimilarityIndex {
    /// Pairs a pivot index with its matrix; their sizes must agree.
    pub fn new(pivot: PivotIndex, matrix: SimilarityMatrix) -> SimilarityResult<Self> {
        if pivot.len() != matrix.dim() {
            return Err(SimilarityError::PivotMismatch {
                pivot_len: pivot.len(),
                dim: matrix.dim(),
            });
        }
        Ok(Self {
            pivot,
            matrix,
            lookups: AtomicU64::new(0),
        })
    }

    /// An index with no pivot titles: every lookup falls through to the fallback tiers.
    pub fn empty() -> Self {
        Self {
            pivot: PivotIndex::default(),
            matrix: SimilarityMatrix::empty(),
            lookups: AtomicU64::new(0),
        }
    }

    /// Row of `title` in the pivot table.
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.pivot.index_of(title)
    }

    /// The `k` titles most similar to the title at `row`, excluding itself.
    pub fn neighbours(&self, row: usize, k: usize) -> Vec<SimilarTitle<'_>> {
        self.matrix
            .top_k_excluding(row, k)
            .into_iter()
            .filter_map(|scored| {
                self.pivot.title(scored.index).map(|title| SimilarTitle {
                    title,
                    score: scored.score,
                })
            })
            .collect()
    }

    pub fn pivot(&self) -> &PivotIndex {
        &self.pivot
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.pivot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pivot.is_empty()
    }

    /// Number of [`index_of`](Self::index_of) calls so far.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SimilarityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityIndex")
            .field("titles", &self.pivot.len())
            .field("matrix", &self.matrix)
            .finish()
    }
}
