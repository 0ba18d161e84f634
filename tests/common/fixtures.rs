//! Test fixtures for integration tests.

use folio::BookRecord;
use folio::snapshot::{BOOKS_FILE, PIVOT_FILE, POPULAR_FILE, SIMILARITY_FILE};
use tempfile::TempDir;

pub const ORWELL: &str = "George Orwell";

pub fn book(title: &str, author: &str) -> BookRecord {
    BookRecord::new(title, author, format!("http://covers/{}.jpg", title))
}

/// Row-major little-endian `f32` bytes, the on-disk matrix format.
pub fn matrix_bytes(rows: &[Vec<f32>]) -> Vec<u8> {
    rows.iter()
        .flatten()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

/// Writes snapshot directories for loading tests.
#[derive(Default)]
pub struct SnapshotDirBuilder {
    books: Vec<BookRecord>,
    pivot: Vec<String>,
    rows: Vec<Vec<f32>>,
    popular: Option<Vec<BookRecord>>,
}

impl SnapshotDirBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(mut self, record: BookRecord) -> Self {
        self.books.push(record);
        self
    }

    pub fn books(mut self, records: impl IntoIterator<Item = BookRecord>) -> Self {
        self.books.extend(records);
        self
    }

    /// Adds a pivot title and its similarity row.
    pub fn pivot_row(mut self, title: &str, row: Vec<f32>) -> Self {
        self.pivot.push(title.to_string());
        self.rows.push(row);
        self
    }

    pub fn popular(mut self, records: Vec<BookRecord>) -> Self {
        self.popular = Some(records);
        self
    }

    pub fn write(self) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path();

        let books = serde_json::to_vec(&self.books).expect("serialize books");
        std::fs::write(path.join(BOOKS_FILE), books).expect("write books");

        let pivot = serde_json::to_vec(&self.pivot).expect("serialize pivot");
        std::fs::write(path.join(PIVOT_FILE), pivot).expect("write pivot");

        std::fs::write(path.join(SIMILARITY_FILE), matrix_bytes(&self.rows))
            .expect("write matrix");

        if let Some(popular) = self.popular {
            let popular = serde_json::to_vec(&popular).expect("serialize popular");
            std::fs::write(path.join(POPULAR_FILE), popular).expect("write popular");
        }

        dir
    }
}

/// A small shelf: two Orwell titles in the model, a prolific author outside it, and
/// enough rated titles for a derived popularity list.
pub fn bookshelf() -> SnapshotDirBuilder {
    let mut builder = SnapshotDirBuilder::new()
        .book(book("1984", ORWELL).with_ratings(400, 8.5))
        .book(book("Animal Farm", ORWELL).with_ratings(300, 7.9))
        .book(book("Emma", "Jane Austen").with_ratings(260, 8.9))
        .book(book("Persuasion", "Jane Austen").with_ratings(40, 9.5));

    for i in 0..6 {
        builder = builder.book(
            book(&format!("Discworld {}", i), "Terry Pratchett").with_ratings(251 + i, 8.0),
        );
    }

    builder
        .pivot_row("1984", vec![1.0, 0.8, 0.3])
        .pivot_row("Animal Farm", vec![0.8, 1.0, 0.3])
        .pivot_row("Emma", vec![0.3, 0.3, 1.0])
}
