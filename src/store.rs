//! JSON-file backed book collection served by the books API.
//!
//! The file holds `{"books": [...]}`. Every mutation is written back before
//! it becomes visible; a failed write leaves the in-memory collection as it
//! was.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::filter::{filter_books, FilterCriteria};
use crate::catalog::model::{Book, BookId, BookPatch, NewBook};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("data file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no book ids left after {0}")]
    IdsExhausted(BookId),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    books: Vec<Book>,
}

pub struct BookStore {
    path: PathBuf,
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    /// Loads the data file; a missing file starts an empty collection.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let books = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<DataFile>(&bytes)?.books,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "data file missing, starting empty");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        info!(path = %path.display(), count = books.len(), "book store loaded");
        Ok(Self {
            path,
            books: RwLock::new(books),
        })
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    pub async fn list(&self, criteria: &FilterCriteria) -> Vec<Book> {
        let books = self.books.read().await;
        filter_books(&books, criteria).into_iter().cloned().collect()
    }

    pub async fn get(&self, id: BookId) -> Option<Book> {
        self.books.read().await.iter().find(|b| b.id == id).cloned()
    }

    /// Assigns the next id after the highest one in use.
    pub async fn insert(&self, new_book: NewBook) -> StoreResult<Book> {
        let mut books = self.books.write().await;
        let highest = books.iter().map(|b| b.id).max().unwrap_or(0);
        let id = highest
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(highest))?;
        let book = new_book.into_book(id);

        let mut next = books.clone();
        next.push(book.clone());
        self.persist(&next).await?;
        *books = next;

        debug!(book_id = id, "book inserted");
        Ok(book)
    }

    pub async fn update(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>> {
        let mut books = self.books.write().await;
        let Some(index) = books.iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let mut next = books.clone();
        patch.apply(&mut next[index]);
        let updated = next[index].clone();
        self.persist(&next).await?;
        *books = next;

        debug!(book_id = id, status = %updated.status, "book updated");
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: BookId) -> StoreResult<Option<Book>> {
        let mut books = self.books.write().await;
        let Some(index) = books.iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let mut next = books.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;
        *books = next;

        debug!(book_id = id, "book deleted");
        Ok(Some(removed))
    }

    async fn persist(&self, books: &[Book]) -> StoreResult<()> {
        let file = DataFile {
            books: books.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&file)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
