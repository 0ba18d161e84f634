use super::error::{SearchError, SearchResult};
use crate::catalog::BookRecord;
use crate::constants::{ALL_PARTITION, DEFAULT_PAGE_LIMIT};

/// Cache key selecting a slice of the sorted catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKey {
    /// The whole sorted catalog.
    All,
    /// Titles starting with this character (case-sensitive).
    Letter(char),
}

impl PartitionKey {
    /// Parses a raw `letter` parameter.
    ///
    /// Absent, empty (after trimming) and `"all"` select [`PartitionKey::All`]; a single
    /// character selects its partition; anything longer is rejected.
    pub fn parse(letter: Option<&str>) -> SearchResult<Self> {
        let Some(raw) = letter.map(str::trim) else {
            return Ok(PartitionKey::All);
        };

        if raw.is_empty() || raw == ALL_PARTITION {
            return Ok(PartitionKey::All);
        }

        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(PartitionKey::Letter(c)),
            _ => Err(SearchError::InvalidLetter {
                value: raw.to_string(),
            }),
        }
    }

    #[inline]
    pub fn matches(&self, title: &str) -> bool {
        match self {
            PartitionKey::All => true,
            PartitionKey::Letter(c) => title.starts_with(*c),
        }
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionKey::All => write!(f, "{}", ALL_PARTITION),
            PartitionKey::Letter(c) => write!(f, "{}", c),
        }
    }
}

/// A paginated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub letter: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            letter: None,
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl SearchQuery {
    /// An unfiltered page over the whole catalog.
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn letter(mut self, letter: impl Into<String>) -> Self {
        self.letter = Some(letter.into());
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub records: Vec<BookRecord>,
    /// `true` when records exist past this page.
    pub has_more: bool,
    /// Size of the filtered set before pagination.
    pub total: usize,
}

/// Build and scan counters for a [`SearchCache`](super::SearchCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCacheStats {
    /// Times the sorted projection was built (at most one).
    pub sorted_builds: u64,
    /// Times a letter partition was computed.
    pub partition_builds: u64,
    /// Number of letter partitions currently cached.
    pub cached_partitions: usize,
    /// Suggestion requests that scanned the catalog.
    pub suggestion_scans: u64,
}
