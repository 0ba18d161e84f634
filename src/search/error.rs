use thiserror::Error;

/// Malformed search requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid letter '{value}': expected a single character or 'all'")]
    InvalidLetter { value: String },

    #[error("limit must be greater than zero")]
    ZeroLimit,
}

pub type SearchResult<T> = Result<T, SearchError>;
