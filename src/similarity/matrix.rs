//! Square item-item similarity matrix.
//!
//! On disk the matrix is a bare row-major `f32` array (`dim * dim * 4` bytes, little
//! endian). [`SimilarityMatrix::open`] maps it read-only and reads rows straight out
//! of the mapping; [`SimilarityMatrix::from_rows`] builds an owned copy for tests and
//! small fixtures.

use std::cmp::Ordering;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

use super::error::{SimilarityError, SimilarityResult};

const F32_BYTES: usize = std::mem::size_of::<f32>();

enum MatrixStorage {
    Owned(Vec<f32>),
    Mapped(Mmap),
}

impl MatrixStorage {
    fn values(&self) -> &[f32] {
        match self {
            MatrixStorage::Owned(v) => v.as_slice(),
            // Alignment and length are checked in `open`.
            MatrixStorage::Mapped(m) => bytemuck::cast_slice(m.deref()),
        }
    }
}

/// A column index paired with its similarity to the queried row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

pub struct SimilarityMatrix {
    storage: MatrixStorage,
    dim: usize,
}

impl SimilarityMatrix {
    /// Builds an owned matrix from explicit rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> SimilarityResult<Self> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for (row, data) in rows.into_iter().enumerate() {
            if data.len() != dim {
                return Err(SimilarityError::RaggedRow {
                    row,
                    len: data.len(),
                    dim,
                });
            }
            values.extend(data);
        }
        Self::from_values(values, dim)
    }

    /// Builds an owned matrix from a flat row-major buffer.
    pub fn from_values(values: Vec<f32>, dim: usize) -> SimilarityResult<Self> {
        if values.len() != dim * dim {
            return Err(SimilarityError::SizeMismatch {
                dim,
                expected: dim * dim * F32_BYTES,
                actual: values.len() * F32_BYTES,
            });
        }
        check_finite(&values, dim)?;
        Ok(Self {
            storage: MatrixStorage::Owned(values),
            dim,
        })
    }

    /// A 0x0 matrix.
    pub fn empty() -> Self {
        Self {
            storage: MatrixStorage::Owned(Vec::new()),
            dim: 0,
        }
    }

    /// Memory-maps a matrix file whose side length is already known (the pivot size).
    pub fn open<P: AsRef<Path>>(path: P, dim: usize) -> SimilarityResult<Self> {
        let file = File::open(path.as_ref())?;
        let actual = file.metadata()?.len() as usize;
        let expected = dim * dim * F32_BYTES;

        if actual != expected {
            return Err(SimilarityError::SizeMismatch {
                dim,
                expected,
                actual,
            });
        }

        if dim == 0 {
            return Ok(Self::empty());
        }

        // SAFETY: the file is opened read-only and the snapshot directory is treated
        // as frozen for the process lifetime; nothing writes to it while mapped.
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let values: &[f32] =
            bytemuck::try_cast_slice(mmap.deref()).map_err(|_| SimilarityError::Misaligned)?;
        check_finite(values, dim)?;

        Ok(Self {
            storage: MatrixStorage::Mapped(mmap),
            dim,
        })
    }

    /// Side length.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn row(&self, idx: usize) -> Option<&[f32]> {
        if idx >= self.dim {
            return None;
        }
        let start = idx * self.dim;
        Some(&self.storage.values()[start..start + self.dim])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.row(row).and_then(|r| r.get(col).copied())
    }

    /// Returns the `k` highest-scoring columns of `row`, never including `row` itself.
    ///
    /// Columns are ranked by descending score with a stable sort, so equal scores keep
    /// ascending column order. Excluding the row by index (rather than dropping the
    /// first ranked entry) keeps the query out of the result even when another column
    /// ties with the diagonal.
    pub fn top_k_excluding(&self, row: usize, k: usize) -> Vec<ScoredIndex> {
        let Some(scores) = self.row(row) else {
            return Vec::new();
        };

        let mut ranked: Vec<usize> = (0..scores.len()).filter(|&col| col != row).collect();
        ranked.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(k);

        ranked
            .into_iter()
            .map(|index| ScoredIndex {
                index,
                score: scores[index],
            })
            .collect()
    }

    /// Counts rows whose diagonal entry is not the row maximum.
    pub fn diagonal_violations(&self) -> usize {
        (0..self.dim)
            .filter(|&i| {
                self.row(i).is_some_and(|r| {
                    let diag = r[i];
                    r.iter().any(|&v| v > diag)
                })
            })
            .count()
    }

    /// Raw row-major bytes, as stored on disk.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.storage.values())
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, MatrixStorage::Mapped(_))
    }
}

impl std::fmt::Debug for SimilarityMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityMatrix")
            .field("dim", &self.dim)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

fn check_finite(values: &[f32], dim: usize) -> SimilarityResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(pos) => Err(SimilarityError::NonFinite {
            row: pos / dim.max(1),
            col: pos % dim.max(1),
        }),
        None => Ok(()),
    }
}
