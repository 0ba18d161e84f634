use serde::{Deserialize, Serialize};

/// One catalog row.
///
/// Titles are not unique across editions; everything that deduplicates does so by
/// `title`, keeping the first occurrence. The aliases accept the column names of the
/// public rating dataset export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(alias = "Book-Title")]
    pub title: String,

    #[serde(alias = "Book-Author")]
    pub author: String,

    /// Opaque image locator (usually a URL).
    #[serde(alias = "Image-URL-M")]
    pub cover_ref: String,

    #[serde(default, alias = "Book-Rating")]
    pub rating_count: u32,

    #[serde(default, alias = "avg_ratings")]
    pub avg_rating: f32,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        cover_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover_ref: cover_ref.into(),
            rating_count: 0,
            avg_rating: 0.0,
        }
    }

    /// Sets the rating statistics (builder style).
    pub fn with_ratings(mut self, rating_count: u32, avg_rating: f32) -> Self {
        self.rating_count = rating_count;
        self.avg_rating = avg_rating;
        self
    }

    /// Case-insensitive substring match over title or author.
    ///
    /// `needle_lower` must already be lowercased; callers lowercase once per request.
    #[inline]
    pub fn matches_keyword(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.author.to_lowercase().contains(needle_lower)
    }
}
