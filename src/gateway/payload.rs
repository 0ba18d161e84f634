//! Wire shapes for the JSON API.
//!
//! Field names follow the browser client, which predates this server. List views read
//! the rating dataset's column names; the search bar reads short lowercase names.

use serde::{Deserialize, Serialize};

use crate::catalog::BookRecord;
use crate::recommend::{FallbackSource, RecommendationResult};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub user_input: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub letter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Raw query parameters; numbers are parsed by the handler so bad values map to a 400
/// with the usual error body.
#[derive(Debug, Default, Deserialize)]
pub struct LoadMoreParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub letter: Option<String>,
    pub keyword: Option<String>,
}

/// Row of the catalogue listing views, keyed by the dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRow {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Image-URL-M")]
    pub image: String,
}

impl From<&BookRecord> for BookRow {
    fn from(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            image: book.cover_ref.clone(),
        }
    }
}

/// Search bar suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub image: String,
}

impl From<&BookRecord> for BookSummary {
    fn from(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            image: book.cover_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularBook {
    pub book_name: String,
    pub author: String,
    pub image: String,
    pub votes: u32,
    pub rating: f32,
}

impl From<&BookRecord> for PopularBook {
    fn from(book: &BookRecord) -> Self {
        Self {
            book_name: book.title.clone(),
            author: book.author.clone(),
            image: book.cover_ref.clone(),
            votes: book.rating_count,
            rating: book.avg_rating,
        }
    }
}

/// `[title, author, image]`, the row shape the recommendation view renders.
pub type RecommendationRow = [String; 3];

pub fn recommendation_row(book: &BookRecord) -> RecommendationRow {
    [
        book.title.clone(),
        book.author.clone(),
        book.cover_ref.clone(),
    ]
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> DataResponse<T> {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a BookRecord>,
        T: From<&'a BookRecord>,
    {
        Self {
            data: records.into_iter().map(T::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub data: Vec<RecommendationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub source: &'static str,
}

impl RecommendResponse {
    pub fn from_result(result: &RecommendationResult) -> Self {
        let source = match result {
            RecommendationResult::Fallback {
                source: FallbackSource::Author,
                ..
            } => "author",
            RecommendationResult::Fallback {
                source: FallbackSource::Popular,
                ..
            } => "popular",
            RecommendationResult::Similar { .. } | RecommendationResult::NotFound { .. } => {
                "similar"
            }
        };

        Self {
            data: result.records().iter().map(recommendation_row).collect(),
            message: result.message().map(str::to_string),
            source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub data: Vec<RecommendationRow>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct LoadMoreResponse {
    pub data: Vec<BookRow>,
    pub has_more: bool,
    pub total_books: usize,
}
