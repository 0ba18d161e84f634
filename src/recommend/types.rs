use crate::catalog::BookRecord;

/// Which list an author-tier fallback was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackSource {
    /// The requested author has enough titles of their own.
    Author,
    /// Too few author titles; served from the popularity list.
    Popular,
}

impl FallbackSource {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackSource::Author => "author",
            FallbackSource::Popular => "popular",
        }
    }
}

impl std::fmt::Display for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of resolving a title.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResult {
    /// No catalog record has this title.
    NotFound { message: String },
    /// Nearest neighbours from the similarity matrix.
    Similar { records: Vec<BookRecord> },
    /// The title is catalogued but outside the trained model.
    Fallback {
        records: Vec<BookRecord>,
        source: FallbackSource,
        message: String,
    },
}

impl RecommendationResult {
    pub(crate) fn not_found(title: &str) -> Self {
        RecommendationResult::NotFound {
            message: format!(
                "Book \"{}\" not found in our database. Please check the spelling or try a different book.",
                title
            ),
        }
    }

    pub(crate) fn fallback(title: &str, records: Vec<BookRecord>, source: FallbackSource) -> Self {
        RecommendationResult::Fallback {
            records,
            source,
            message: format!(
                "Book \"{}\" is not in our recommendation database, but here are some suggestions:",
                title
            ),
        }
    }

    /// The recommended records (empty for `NotFound`).
    pub fn records(&self) -> &[BookRecord] {
        match self {
            RecommendationResult::NotFound { .. } => &[],
            RecommendationResult::Similar { records }
            | RecommendationResult::Fallback { records, .. } => records,
        }
    }

    /// User-facing message, if the outcome carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            RecommendationResult::NotFound { message }
            | RecommendationResult::Fallback { message, .. } => Some(message),
            RecommendationResult::Similar { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, RecommendationResult::NotFound { .. })
    }

    /// Status value reported in the [`FOLIO_STATUS_HEADER`](crate::constants::FOLIO_STATUS_HEADER) header.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            RecommendationResult::NotFound { .. } => "not_found",
            RecommendationResult::Similar { .. } => "similar",
            RecommendationResult::Fallback {
                source: FallbackSource::Author,
                ..
            } => "fallback_author",
            RecommendationResult::Fallback {
                source: FallbackSource::Popular,
                ..
            } => "fallback_popular",
        }
    }
}

impl std::fmt::Display for RecommendationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationResult::NotFound { .. } => write!(f, "NOT_FOUND"),
            RecommendationResult::Similar { records } => {
                write!(f, "SIMILAR ({} records)", records.len())
            }
            RecommendationResult::Fallback {
                records, source, ..
            } => write!(f, "FALLBACK {} ({} records)", source, records.len()),
        }
    }
}
