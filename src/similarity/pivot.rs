use std::collections::HashMap;

use super::error::{SimilarityError, SimilarityResult};

/// Ordered, unique titles: the rows of the training pivot table.
///
/// Row `i` of the similarity matrix belongs to `titles[i]`.
#[derive(Debug, Clone, Default)]
pub struct PivotIndex {
    titles: Vec<String>,
    positions: HashMap<String, usize>,
}

impl PivotIndex {
    /// Builds the index, rejecting duplicate titles.
    pub fn new(titles: Vec<String>) -> SimilarityResult<Self> {
        let mut positions = HashMap::with_capacity(titles.len());
        for (idx, title) in titles.iter().enumerate() {
            if positions.insert(title.clone(), idx).is_some() {
                return Err(SimilarityError::DuplicateTitle {
                    title: title.clone(),
                });
            }
        }
        Ok(Self { titles, positions })
    }

    #[inline]
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    #[inline]
    pub fn title(&self, idx: usize) -> Option<&str> {
        self.titles.get(idx).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
