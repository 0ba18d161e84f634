use std::path::PathBuf;
use thiserror::Error;

use crate::similarity::SimilarityError;

/// Load-time faults. Any of these stops the service from starting.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog snapshot is empty")]
    EmptyCatalog,

    #[error("invalid record '{title}' in {path}: {reason}")]
    InvalidRecord {
        path: PathBuf,
        title: String,
        reason: String,
    },

    #[error("similarity index at {path}: {source}")]
    Similarity {
        path: PathBuf,
        #[source]
        source: SimilarityError,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
