//! Book records as exchanged with the books API.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type BookId = u64;

// ============================================================
// ReadingStatus
// ============================================================

/// Where a book sits on the reader's shelf.
///
/// Flat enumeration: any value may be replaced by any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    Read,
    Reading,
    #[default]
    WantToRead,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [Self::Read, Self::Reading, Self::WantToRead];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Reading => "reading",
            Self::WantToRead => "want-to-read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Self::Read),
            "reading" => Some(Self::Reading),
            "want-to-read" => Some(Self::WantToRead),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// Book
// ============================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the books API, never changed afterwards
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Cover image URL
    #[serde(default)]
    pub cover: String,
    /// 0-5 scale
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub status: ReadingStatus,
}

/// Payload for `POST /api/books`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub status: ReadingStatus,
}

impl NewBook {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            cover: self.cover,
            rating: self.rating,
            pages: self.pages,
            genre: self.genre,
            status: self.status,
        }
    }
}

/// Partial update for `PUT /api/books/:id`. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
}

impl BookPatch {
    pub fn status(status: ReadingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(cover) = self.cover {
            book.cover = cover;
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
    }
}
