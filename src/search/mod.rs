//! Catalog search: letter partitions, keyword filtering, pagination and suggestions.

pub mod cache;
pub mod error;
pub mod types;


pub use cache::SearchCache;
pub use error::{SearchError, SearchResult};
pub use types::{PartitionKey, SearchCacheStats, SearchPage, SearchQuery};
