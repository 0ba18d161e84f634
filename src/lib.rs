//! Folio library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Snapshot
//! - [`Snapshot`], [`SnapshotError`] - Loading the frozen training artifacts
//! - [`SnapshotFingerprint`] - BLAKE3 identity of a loaded snapshot
//!
//! ## Core Types
//! - [`BookRecord`], [`Catalog`], [`PopularBooks`] - Catalog data
//! - [`PivotIndex`], [`SimilarityMatrix`], [`SimilarityIndex`] - The trained model
//!
//! ## Services
//! - [`Recommender`], [`RecommendationResult`] - Three-tier title resolution
//! - [`SearchCache`], [`SearchQuery`], [`SearchPage`] - Partitioned catalog search
//!
//! ## Server
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`gateway`] - Axum router and handlers

pub mod catalog;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod hashing;
pub mod recommend;
pub mod search;
pub mod similarity;
pub mod snapshot;

pub use catalog::{BookRecord, Catalog, PopularBooks};
pub use config::{Config, ConfigError};
pub use constants::{
    ALL_PARTITION, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_LIMIT, DEFAULT_POPULAR_MIN_RATINGS,
    DEFAULT_POPULAR_SIZE, FOLIO_STATUS_HEADER, PopularityConfig, RECOMMENDATION_COUNT,
    SUGGESTION_LIMIT, SUGGESTION_MIN_CHARS,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use hashing::{SnapshotFingerprint, SnapshotHasher};
pub use recommend::{FallbackSource, RecommendationResult, Recommender};
pub use search::{
    PartitionKey, SearchCache, SearchCacheStats, SearchError, SearchPage, SearchQuery,
};
pub use similarity::{
    PivotIndex, ScoredIndex, SimilarTitle, SimilarityError, SimilarityIndex, SimilarityMatrix,
};
pub use snapshot::{Snapshot, SnapshotError, SnapshotResult};
