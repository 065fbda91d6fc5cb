//! Filter criteria and the predicates that derive the visible book list.
//!
//! Everything here is pure: the visible list depends only on the working
//! collection and the criteria passed in. The same predicates back the
//! `GET /api/books` query filter on the service side.

use std::collections::HashSet;

use crate::catalog::model::{Book, ReadingStatus};

/// Sentinel used by the genre and status selectors for "no constraint".
pub const ALL: &str = "all";

// ============================================================
// Selectors
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    /// Case-sensitive exact match
    Exact(String),
}

impl GenreFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Exact(genre) => book.genre == *genre,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Is(ReadingStatus),
    /// A value outside the known statuses; matches no book.
    Unrecognized(String),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            return Self::All;
        }
        match ReadingStatus::parse(value) {
            Some(status) => Self::Is(status),
            None => Self::Unrecognized(value.to_string()),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Is(status) => book.status == *status,
            Self::Unrecognized(_) => false,
        }
    }
}

impl From<ReadingStatus> for StatusFilter {
    fn from(status: ReadingStatus) -> Self {
        Self::Is(status)
    }
}

// ============================================================
// RatingRange
// ============================================================

/// Inclusive rating interval, or no constraint at all.
///
/// `Any` is its own state; `Between { min: 0.0, max: 0.0 }` only admits
/// unrated books.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RatingRange {
    #[default]
    Any,
    Between { min: f64, max: f64 },
}

impl RatingRange {
    /// Ranges offered by the browse view, with their labels.
    pub const PRESETS: [(&'static str, RatingRange); 5] = [
        ("Any Rating", RatingRange::Any),
        ("2.0 - 2.9", RatingRange::Between { min: 2.0, max: 2.9 }),
        ("3.0 - 3.9", RatingRange::Between { min: 3.0, max: 3.9 }),
        ("4.0 - 4.9", RatingRange::Between { min: 4.0, max: 4.9 }),
        ("5.0", RatingRange::Between { min: 5.0, max: 5.0 }),
    ];

    pub fn between(min: f64, max: f64) -> Self {
        Self::Between { min, max }
    }

    /// Open-ended lower bound, as used by the `minRating` query parameter.
    pub fn at_least(min: f64) -> Self {
        Self::Between {
            min,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, rating: f64) -> bool {
        match *self {
            Self::Any => true,
            Self::Between { min, max } => rating >= min && rating <= max,
        }
    }

    /// Accepts `any`, a preset label, `MIN-MAX`, or a single value `X` for `[X, X]`.
    pub fn parse(value: &str) -> Result<Self, RatingRangeError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("any") || trimmed.is_empty() {
            return Ok(Self::Any);
        }
        if let Some((_, preset)) = Self::PRESETS.iter().find(|(label, _)| *label == trimmed) {
            return Ok(*preset);
        }

        let parse_bound = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RatingRangeError(value.to_string()))
        };

        let range = match trimmed.split_once('-') {
            Some((min, max)) => Self::between(parse_bound(min)?, parse_bound(max)?),
            None => {
                let exact = parse_bound(trimmed)?;
                Self::between(exact, exact)
            }
        };

        match range {
            Self::Between { min, max } if min > max => Err(RatingRangeError(value.to_string())),
            range => Ok(range),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rating range `{0}`, expected `any`, `MIN-MAX` or a single rating")]
pub struct RatingRangeError(pub String);

// ============================================================
// FilterCriteria
// ============================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub genre: GenreFilter,
    pub status: StatusFilter,
    pub rating_range: RatingRange,
}

impl FilterCriteria {
    /// All four predicates must hold.
    pub fn matches(&self, book: &Book) -> bool {
        matches_search(&self.search_term, book)
            && self.genre.matches(book)
            && self.status.matches(book)
            && self.rating_range.contains(book.rating)
    }

    pub fn apply(&mut self, update: CriteriaUpdate) {
        if let Some(search_term) = update.search_term {
            self.search_term = search_term;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(rating_range) = update.rating_range {
            self.rating_range = rating_range;
        }
    }
}

/// Partial criteria change; `None` fields are left as they are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriteriaUpdate {
    pub search_term: Option<String>,
    pub genre: Option<GenreFilter>,
    pub status: Option<StatusFilter>,
    pub rating_range: Option<RatingRange>,
}

impl CriteriaUpdate {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn genre(mut self, genre: GenreFilter) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn rating(mut self, range: RatingRange) -> Self {
        self.rating_range = Some(range);
        self
    }
}

fn matches_search(term: &str, book: &Book) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

// ============================================================
// Derivations
// ============================================================

/// Books matching `criteria`, in collection order.
pub fn filter_books<'a>(books: &'a [Book], criteria: &FilterCriteria) -> Vec<&'a Book> {
    books.iter().filter(|book| criteria.matches(book)).collect()
}

/// `"all"` followed by each distinct genre in first-seen order.
pub fn genres_of(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut genres = vec![ALL.to_string()];
    for book in books {
        if seen.insert(book.genre.as_str()) {
            genres.push(book.genre.clone());
        }
    }
    genres
}
