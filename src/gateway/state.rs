use std::sync::Arc;

use crate::catalog::PopularBooks;
use crate::constants::DEFAULT_MAX_PAGE_SIZE;
use crate::hashing::SnapshotFingerprint;
use crate::recommend::Recommender;
use crate::search::SearchCache;
use crate::snapshot::Snapshot;

#[derive(Clone)]
pub struct HandlerState {
    pub recommender: Arc<Recommender>,

    pub search: Arc<SearchCache>,

    pub popular: Arc<PopularBooks>,

    pub fingerprint: SnapshotFingerprint,

    /// Largest `limit` accepted by `/api/load_more_books`.
    pub max_page_size: usize,
}

impl HandlerState {
    pub fn new(snapshot: &Snapshot, max_page_size: usize) -> Self {
        Self {
            recommender: Arc::new(snapshot.recommender()),
            search: Arc::new(snapshot.search_cache()),
            popular: Arc::clone(&snapshot.popular),
            fingerprint: snapshot.fingerprint,
            max_page_size,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(snapshot, DEFAULT_MAX_PAGE_SIZE)
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("fingerprint", &self.fingerprint.short())
            .field("max_page_size", &self.max_page_size)
            .finish_non_exhaustive()
    }
}
