//! Frozen snapshot loading.
//!
//! A snapshot directory holds the artifacts produced by the offline training job:
//!
//! | File | Contents |
//! |------|----------|
//! | `books.json` | catalog rows |
//! | `pivot.json` | pivot-table titles, in matrix row order |
//! | `similarity.f32` | row-major little-endian `f32` matrix |
//! | `popular.json` | optional popularity list (derived from the catalog when absent) |
//!
//! Every resolution path depends on all of them, so any load fault is fatal. Soft
//! inconsistencies (pivot titles missing from the catalog, off-diagonal maxima) are
//! logged and tolerated; the resolver drops what it cannot map back to a record.

pub mod error;


pub use error::{SnapshotError, SnapshotResult};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::catalog::{BookRecord, Catalog, PopularBooks};
use crate::constants::PopularityConfig;
use crate::hashing::{SnapshotFingerprint, SnapshotHasher};
use crate::recommend::Recommender;
use crate::search::SearchCache;
use crate::similarity::{PivotIndex, SimilarityIndex, SimilarityMatrix};

pub const BOOKS_FILE: &str = "books.json";
pub const PIVOT_FILE: &str = "pivot.json";
pub const SIMILARITY_FILE: &str = "similarity.f32";
pub const POPULAR_FILE: &str = "popular.json";

/// All load-once artifacts, shared read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Arc<Catalog>,
    pub index: Arc<SimilarityIndex>,
    pub popular: Arc<PopularBooks>,
    pub fingerprint: SnapshotFingerprint,
    /// `true` when the popularity list was computed from the catalog.
    pub popular_derived: bool,
}

impl Snapshot {
    /// Loads and validates a snapshot directory.
    pub fn load<P: AsRef<Path>>(dir: P, popularity: PopularityConfig) -> SnapshotResult<Self> {
        let dir = dir.as_ref();
        let mut hasher = SnapshotHasher::new();

        let books_path = dir.join(BOOKS_FILE);
        let (rows, raw): (Vec<BookRecord>, _) = read_json(&books_path)?;
        hasher.update(BOOKS_FILE, &raw);
        validate_records(&books_path, &rows)?;
        if rows.is_empty() {
            return Err(SnapshotError::EmptyCatalog);
        }
        let catalog = Catalog::new(rows);

        let pivot_path = dir.join(PIVOT_FILE);
        let (titles, raw): (Vec<String>, _) = read_json(&pivot_path)?;
        hasher.update(PIVOT_FILE, &raw);
        let pivot = PivotIndex::new(titles).map_err(|source| SnapshotError::Similarity {
            path: pivot_path.clone(),
            source,
        })?;

        let matrix_path = dir.join(SIMILARITY_FILE);
        if !matrix_path.exists() {
            return Err(SnapshotError::FileNotFound { path: matrix_path });
        }
        let matrix = SimilarityMatrix::open(&matrix_path, pivot.len()).map_err(|source| {
            SnapshotError::Similarity {
                path: matrix_path.clone(),
                source,
            }
        })?;
        hasher.update(SIMILARITY_FILE, matrix.as_bytes());

        let index = SimilarityIndex::new(pivot, matrix).map_err(|source| {
            SnapshotError::Similarity {
                path: matrix_path,
                source,
            }
        })?;

        let popular_path = dir.join(POPULAR_FILE);
        let (popular, popular_derived) = if popular_path.exists() {
            let (rows, raw): (Vec<BookRecord>, _) = read_json(&popular_path)?;
            hasher.update(POPULAR_FILE, &raw);
            validate_records(&popular_path, &rows)?;
            (PopularBooks::from_records(rows), false)
        } else {
            (PopularBooks::derive(&catalog, popularity), true)
        };

        let snapshot = Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            popular: Arc::new(popular),
            fingerprint: hasher.finalize(),
            popular_derived,
        };
        snapshot.report_consistency();

        info!(
            dir = %dir.display(),
            books = snapshot.catalog.len(),
            titles = snapshot.catalog.unique_len(),
            pivot_titles = snapshot.index.len(),
            popular = snapshot.popular.len(),
            popular_derived,
            fingerprint = %snapshot.fingerprint.short(),
            "Snapshot loaded"
        );

        Ok(snapshot)
    }

    /// Assembles a snapshot from in-memory parts (fixtures, embedding callers).
    pub fn from_parts(catalog: Catalog, index: SimilarityIndex, popular: PopularBooks) -> Self {
        let mut hasher = SnapshotHasher::new();
        for row in catalog.rows() {
            hasher.update(BOOKS_FILE, row.title.as_bytes());
        }
        for title in index.pivot().titles() {
            hasher.update(PIVOT_FILE, title.as_bytes());
        }
        hasher.update(SIMILARITY_FILE, index.matrix().as_bytes());
        for row in popular.as_slice() {
            hasher.update(POPULAR_FILE, row.title.as_bytes());
        }

        Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            popular: Arc::new(popular),
            fingerprint: hasher.finalize(),
            popular_derived: false,
        }
    }

    pub fn recommender(&self) -> Recommender {
        Recommender::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.index),
            Arc::clone(&self.popular),
        )
    }

    pub fn search_cache(&self) -> SearchCache {
        SearchCache::new(Arc::clone(&self.catalog))
    }

    /// Pivot titles with no catalog record.
    pub fn orphaned_pivot_titles(&self) -> usize {
        self.index
            .pivot()
            .titles()
            .iter()
            .filter(|title| !self.catalog.contains(title))
            .count()
    }

    fn report_consistency(&self) {
        let orphaned = self.orphaned_pivot_titles();
        if orphaned > 0 {
            warn!(
                orphaned,
                "Pivot titles missing from catalog; their recommendations will be dropped"
            );
        }

        let violations = self.index.matrix().diagonal_violations();
        if violations > 0 {
            warn!(
                rows = violations,
                "Similarity rows whose diagonal is not the row maximum"
            );
        }
    }
}

/// Default snapshot directory relative to the working directory.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> SnapshotResult<(T, Vec<u8>)> {
    let raw = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SnapshotError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let value = serde_json::from_slice(&raw).map_err(|source| SnapshotError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((value, raw))
}

fn validate_records(path: &Path, rows: &[BookRecord]) -> SnapshotResult<()> {
    for row in rows {
        let reason = if row.title.is_empty() {
            Some("empty title")
        } else if !row.avg_rating.is_finite() {
            Some("avg_rating is not finite")
        } else if row.avg_rating < 0.0 {
            Some("avg_rating is negative")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SnapshotError::InvalidRecord {
                path: path.to_path_buf(),
                title: row.title.clone(),
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}
