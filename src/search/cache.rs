//! Lazily built search projections over the catalog.
//!
//! The sorted projection is built once on first use. Letter partitions are built on
//! first request per key and kept for the process lifetime: the catalog never changes,
//! so there is nothing to invalidate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use super::error::{SearchError, SearchResult};
use super::types::{PartitionKey, SearchCacheStats, SearchPage, SearchQuery};
use crate::catalog::{BookRecord, Catalog};
use crate::constants::{SUGGESTION_LIMIT, SUGGESTION_MIN_CHARS};

type Partition = Arc<[BookRecord]>;

/// Memoized, title-sorted views of a [`Catalog`].
pub struct SearchCache {
    catalog: Arc<Catalog>,
    sorted: OnceLock<Partition>,
    partitions: RwLock<HashMap<PartitionKey, Partition>>,
    sorted_builds: AtomicU64,
    partition_builds: AtomicU64,
    suggestion_scans: AtomicU64,
}

impl SearchCache {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            sorted: OnceLock::new(),
            partitions: RwLock::new(HashMap::new()),
            sorted_builds: AtomicU64::new(0),
            partition_builds: AtomicU64::new(0),
            suggestion_scans: AtomicU64::new(0),
        }
    }

    /// Deduplicated catalog sorted by title.
    pub fn all_books(&self) -> Partition {
        self.sorted
            .get_or_init(|| {
                let start = Instant::now();
                let mut books: Vec<BookRecord> = self.catalog.unique().cloned().collect();
                books.sort_by(|a, b| a.title.cmp(&b.title));
                self.sorted_builds.fetch_add(1, Ordering::Relaxed);
                info!(
                    books = books.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Sorted catalog cached"
                );
                Arc::from(books)
            })
            .clone()
    }

    /// Returns the partition for `key`, building it on first request.
    ///
    /// Concurrent first requests may each compute the partition; the first insert wins
    /// and later results are discarded.
    pub fn partition(&self, key: PartitionKey) -> Partition {
        let PartitionKey::Letter(letter) = key else {
            return self.all_books();
        };

        if let Some(cached) = self.partitions.read().get(&key) {
            return cached.clone();
        }

        let start = Instant::now();
        let built: Partition = self
            .all_books()
            .iter()
            .filter(|book| key.matches(&book.title))
            .cloned()
            .collect();
        self.partition_builds.fetch_add(1, Ordering::Relaxed);
        info!(
            letter = %letter,
            books = built.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Letter partition cached"
        );

        self.partitions.write().entry(key).or_insert(built).clone()
    }

    /// Returns one page of the partition selected by `query.letter`, filtered by
    /// `query.keyword`.
    #[instrument(skip(self), fields(offset = query.offset, limit = query.limit))]
    pub fn search(&self, query: &SearchQuery) -> SearchResult<SearchPage> {
        if query.limit == 0 {
            return Err(SearchError::ZeroLimit);
        }

        let key = PartitionKey::parse(query.letter.as_deref())?;
        let partition = self.partition(key);

        let page = match normalize_keyword(query.keyword.as_deref()) {
            Some(needle) => {
                let filtered: Vec<&BookRecord> = partition
                    .iter()
                    .filter(|book| book.matches_keyword(&needle))
                    .collect();
                paginate(&filtered[..], query.offset, query.limit, |b| (*b).clone())
            }
            None => paginate(&partition[..], query.offset, query.limit, BookRecord::clone),
        };

        debug!(
            partition = %key,
            returned = page.records.len(),
            total = page.total,
            "Search page served"
        );
        Ok(page)
    }

    /// Every record of the selected partition matching `keyword`, unpaginated.
    #[instrument(skip(self))]
    pub fn search_all(
        &self,
        keyword: Option<&str>,
        letter: Option<&str>,
    ) -> SearchResult<Vec<BookRecord>> {
        let key = PartitionKey::parse(letter)?;
        let partition = self.partition(key);

        let results = match normalize_keyword(keyword) {
            Some(needle) => partition
                .iter()
                .filter(|book| book.matches_keyword(&needle))
                .cloned()
                .collect(),
            None => partition.to_vec(),
        };
        Ok(results)
    }

    /// Up to ten records whose title or author contains `keyword`.
    ///
    /// Keywords shorter than two characters return nothing without touching the
    /// catalog.
    pub fn suggest(&self, keyword: &str) -> Vec<BookRecord> {
        let keyword = keyword.trim();
        if keyword.chars().count() < SUGGESTION_MIN_CHARS {
            return Vec::new();
        }

        self.suggestion_scans.fetch_add(1, Ordering::Relaxed);
        let needle = keyword.to_lowercase();
        self.all_books()
            .iter()
            .filter(|book| book.matches_keyword(&needle))
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn stats(&self) -> SearchCacheStats {
        SearchCacheStats {
            sorted_builds: self.sorted_builds.load(Ordering::Relaxed),
            partition_builds: self.partition_builds.load(Ordering::Relaxed),
            cached_partitions: self.partitions.read().len(),
            suggestion_scans: self.suggestion_scans.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("catalog", &self.catalog)
            .field("stats", &self.stats())
            .finish()
    }
}

fn normalize_keyword(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
}

fn paginate<T>(
    items: &[T],
    offset: usize,
    limit: usize,
    to_record: impl Fn(&T) -> BookRecord,
) -> SearchPage {
    let total = items.len();
    let start = offset.min(total);
    let end = offset.saturating_add(limit).min(total);
    let records: Vec<BookRecord> = items[start..end].iter().map(to_record).collect();

    SearchPage {
        has_more: end < total,
        records,
        total,
    }
}
