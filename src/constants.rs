//! Cross-cutting, shared constants.
//!
//! The popularity values mirror how the frozen `popular` artifact was produced, so a
//! derived popularity list matches a shipped one for the same catalog.

/// Number of titles returned by every recommendation tier.
pub const RECOMMENDATION_COUNT: usize = 5;

/// Minimum `rating_count` for a title to qualify as popular.
pub const DEFAULT_POPULAR_MIN_RATINGS: u32 = 250;

/// Length of the popularity list.
pub const DEFAULT_POPULAR_SIZE: usize = 50;

/// Hard cap on suggestion results.
pub const SUGGESTION_LIMIT: usize = 10;

/// Keywords shorter than this (in characters) never trigger a suggestion scan.
pub const SUGGESTION_MIN_CHARS: usize = 2;

/// Page size used when a caller does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest page a caller may request.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 500;

/// Partition key that selects the whole sorted catalog.
pub const ALL_PARTITION: &str = "all";

/// Response header naming the outcome of a request.
pub const FOLIO_STATUS_HEADER: &str = "X-Folio-Status";
pub const FOLIO_STATUS_OK: &str = "ok";
pub const FOLIO_STATUS_READY: &str = "ready";
pub const FOLIO_STATUS_INVALID: &str = "invalid_request";

/// Runtime popularity configuration.
///
/// Used when `popular.json` is absent and the list is derived from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularityConfig {
    /// Minimum number of ratings a title needs.
    pub min_ratings: u32,
    /// Number of titles kept after sorting.
    pub size: usize,
}

impl Default for PopularityConfig {
    fn default() -> Self {
        Self {
            min_ratings: DEFAULT_POPULAR_MIN_RATINGS,
            size: DEFAULT_POPULAR_SIZE,
        }
    }
}

impl PopularityConfig {
    /// Creates a popularity configuration.
    pub fn new(min_ratings: u32, size: usize) -> Self {
        Self { min_ratings, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popularity_config_default() {
        let config = PopularityConfig::default();
        assert_eq!(config.min_ratings, 250);
        assert_eq!(config.size, 50);
    }

    #[test]
    fn test_suggestion_guard_below_cap() {
        assert!(SUGGESTION_MIN_CHARS < SUGGESTION_LIMIT);
    }
}
