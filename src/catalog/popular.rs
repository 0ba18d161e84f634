//! Popularity list, the deepest fallback tier.

use std::cmp::Ordering;

use super::{BookRecord, Catalog};
use crate::constants::PopularityConfig;

/// Titles with enough ratings, best average first.
#[derive(Debug, Clone, Default)]
pub struct PopularBooks {
    books: Vec<BookRecord>,
}

impl PopularBooks {
    /// Wraps a precomputed list (e.g. a shipped `popular.json`) as-is.
    pub fn from_records(books: Vec<BookRecord>) -> Self {
        Self { books }
    }

    /// Derives the list from the catalog.
    ///
    /// Keeps distinct titles with `rating_count >= min_ratings`, stable-sorts them by
    /// `avg_rating` descending and truncates to `size`.
    pub fn derive(catalog: &Catalog, config: PopularityConfig) -> Self {
        let mut books: Vec<BookRecord> = catalog
            .unique()
            .filter(|book| book.rating_count >= config.min_ratings)
            .cloned()
            .collect();

        books.sort_by(|a, b| {
            b.avg_rating
                .partial_cmp(&a.avg_rating)
                .unwrap_or(Ordering::Equal)
        });
        books.truncate(config.size);

        Self { books }
    }

    /// The first `n` entries (fewer if the list is shorter).
    pub fn head(&self, n: usize) -> &[BookRecord] {
        &self.books[..n.min(self.books.len())]
    }

    pub fn as_slice(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
