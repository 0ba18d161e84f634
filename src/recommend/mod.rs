//! Title resolution.
//!
//! Given an exact catalog title, [`Recommender::resolve`] picks the first tier that
//! applies:
//!
//! 1. title not catalogued: [`RecommendationResult::NotFound`]
//! 2. title in the pivot table: nearest neighbours by similarity, self excluded
//! 3. otherwise: titles by the same author, or the popularity head when the author
//!    has fewer than [`RECOMMENDATION_COUNT`](crate::constants::RECOMMENDATION_COUNT)
//!    titles
//!
//! `NotFound` is an expected outcome, not an error, and is logged at debug level.

pub mod resolver;
pub mod types;


pub use resolver::Recommender;
pub use types::{FallbackSource, RecommendationResult};
