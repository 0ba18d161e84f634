//! Read-only book catalog.
//!
//! The catalog keeps every row in snapshot order (duplicates included) and a
//! first-occurrence index by title. Nothing here mutates after construction, so a
//! [`Catalog`] is shared behind an `Arc` by the resolver and the search cache.

mod model;
pub mod popular;


pub use model::BookRecord;
pub use popular::PopularBooks;

use std::collections::{HashMap, HashSet};

/// Immutable collection of [`BookRecord`]s.
pub struct Catalog {
    rows: Vec<BookRecord>,
    first_by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the catalog, indexing the first row seen for each title.
    pub fn new(rows: Vec<BookRecord>) -> Self {
        let mut first_by_title = HashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            first_by_title.entry(row.title.clone()).or_insert(idx);
        }

        Self {
            rows,
            first_by_title,
        }
    }

    /// Returns the first record with exactly this title.
    #[inline]
    pub fn get(&self, title: &str) -> Option<&BookRecord> {
        self.first_by_title.get(title).map(|&idx| &self.rows[idx])
    }

    #[inline]
    pub fn contains(&self, title: &str) -> bool {
        self.first_by_title.contains_key(title)
    }

    /// All rows in snapshot order, duplicates included.
    pub fn rows(&self) -> &[BookRecord] {
        &self.rows
    }

    /// One record per title, in snapshot order.
    pub fn unique(&self) -> impl Iterator<Item = &BookRecord> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(idx, row)| self.first_by_title.get(&row.title) == Some(idx))
            .map(|(_, row)| row)
    }

    /// Records by `author`, deduplicated by title, in snapshot order.
    ///
    /// Deduplication runs over the author's rows only: an edition credited to this
    /// author counts even if an earlier row with the same title names someone else.
    pub fn by_author(&self, author: &str) -> Vec<&BookRecord> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| row.author == author)
            .filter(|row| seen.insert(row.title.as_str()))
            .collect()
    }

    /// Number of rows, duplicates included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct titles.
    pub fn unique_len(&self) -> usize {
        self.first_by_title.len()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("rows", &self.rows.len())
            .field("titles", &self.first_by_title.len())
            .finish()
    }
}
