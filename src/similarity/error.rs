use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("matrix file is {actual} bytes, expected {expected} for a {dim}x{dim} f32 matrix")]
    SizeMismatch {
        dim: usize,
        expected: usize,
        actual: usize,
    },

    #[error("matrix row {row} has {len} values, expected {dim}")]
    RaggedRow { row: usize, len: usize, dim: usize },

    #[error("matrix value at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },

    #[error("matrix bytes are not aligned for f32 access")]
    Misaligned,

    #[error("pivot index has {pivot_len} titles but matrix dimension is {dim}")]
    PivotMismatch { pivot_len: usize, dim: usize },

    #[error("duplicate pivot title: {title}")]
    DuplicateTitle { title: String },
}

pub type SimilarityResult<T> = Result<T, SimilarityError>;
