//! Client-side catalog: book model, filter criteria, the HTTP fetcher and the
//! filter & status engine built on top of it.

pub mod client;
pub mod engine;
pub mod filter;
pub mod model;

pub use client::{BookApi, CatalogError, CatalogResult, HttpCatalog};
pub use engine::FilterEngine;
pub use filter::{CriteriaUpdate, FilterCriteria, GenreFilter, RatingRange, StatusFilter};
pub use model::{Book, BookId, BookPatch, NewBook, ReadingStatus};
