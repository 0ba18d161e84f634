use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::types::{FallbackSource, RecommendationResult};
use crate::catalog::{BookRecord, Catalog, PopularBooks};
use crate::constants::RECOMMENDATION_COUNT;
use crate::similarity::SimilarityIndex;

/// Three-tier title resolver: similarity, then author, then popularity.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    index: Arc<SimilarityIndex>,
    popular: Arc<PopularBooks>,
    count: usize,
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        index: Arc<SimilarityIndex>,
        popular: Arc<PopularBooks>,
    ) -> Self {
        Self {
            catalog,
            index,
            popular,
            count: RECOMMENDATION_COUNT,
        }
    }

    /// Overrides how many records each tier returns.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn index(&self) -> &Arc<SimilarityIndex> {
        &self.index
    }

    pub fn popular(&self) -> &Arc<PopularBooks> {
        &self.popular
    }

    /// Resolves `title` (exact, case-sensitive) to a recommendation list.
    #[instrument(skip(self), fields(title_len = title.len()))]
    pub fn resolve(&self, title: &str) -> RecommendationResult {
        let Some(record) = self.catalog.get(title) else {
            debug!("Title not in catalog");
            return RecommendationResult::not_found(title);
        };

        match self.index.index_of(title) {
            Some(row) => {
                let records = self.similar(row);
                info!(results = records.len(), "Similarity recommendations");
                RecommendationResult::Similar { records }
            }
            None => {
                let (records, source) = self.fallback(&record.author);
                info!(
                    results = records.len(),
                    source = %source,
                    "Title outside similarity model, serving fallback"
                );
                RecommendationResult::fallback(title, records, source)
            }
        }
    }

    fn similar(&self, row: usize) -> Vec<BookRecord> {
        self.index
            .neighbours(row, self.count)
            .into_iter()
            .filter_map(|neighbour| match self.catalog.get(neighbour.title) {
                Some(record) => Some(record.clone()),
                None => {
                    debug!(
                        neighbour = neighbour.title,
                        score = neighbour.score,
                        "Dropping neighbour missing from catalog"
                    );
                    None
                }
            })
            .collect()
    }

    /// Author titles when there are at least `count` of them, else the popularity head.
    ///
    /// Fewer than `count` author titles are discarded, not padded.
    fn fallback(&self, author: &str) -> (Vec<BookRecord>, FallbackSource) {
        let by_author = self.catalog.by_author(author);

        if by_author.len() < self.count {
            debug!(
                author_titles = by_author.len(),
                "Too few author titles, using popularity list"
            );
            let records = self.popular.head(self.count).to_vec();
            return (records, FallbackSource::Popular);
        }

        let records = by_author
            .into_iter()
            .take(self.count)
            .cloned()
            .collect();
        (records, FallbackSource::Author)
    }
}
