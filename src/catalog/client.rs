//! Catalog fetcher: the HTTP side of the books API.
//!
//! Each call is one independent request. No caching and no retry; a timeout
//! is configured on the underlying client and surfaces as a network failure.

use std::future::Future;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::model::{Book, BookId, BookPatch, NewBook, ReadingStatus};
use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("book {0} not found")]
    NotFound(BookId),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl CatalogError {
    /// Transport or server failure, as opposed to a missing book.
    pub fn is_network(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }

    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("Book {id} was not found."),
            Self::Request(_) | Self::HttpStatus { .. } => {
                "Could not reach the library service. Please try again later.".to_string()
            }
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Remote operations the filter engine relies on.
pub trait BookApi: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = CatalogResult<Vec<Book>>> + Send;

    fn fetch_one(&self, id: BookId) -> impl Future<Output = CatalogResult<Book>> + Send;

    /// Succeeds when the API accepts the change; the echoed record is not
    /// inspected.
    fn update_status(
        &self,
        id: BookId,
        status: ReadingStatus,
    ) -> impl Future<Output = CatalogResult<()>> + Send;
}

// ============================================================
// HttpCatalog
// ============================================================

#[derive(Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: normalize_base_url(&config.api_base_url),
            client,
        }
    }

    pub async fn add_book(&self, book: &NewBook) -> CatalogResult<Book> {
        let resp = self
            .client
            .post(self.books_url())
            .json(book)
            .send()
            .await?;
        decode(resp, None).await
    }

    pub async fn delete_book(&self, id: BookId) -> CatalogResult<Book> {
        let resp = self.client.delete(self.book_url(id)).send().await?;
        decode(resp, Some(id)).await
    }

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url)
    }

    fn book_url(&self, id: BookId) -> String {
        format!("{}/api/books/{id}", self.base_url)
    }
}

impl BookApi for HttpCatalog {
    async fn fetch_all(&self) -> CatalogResult<Vec<Book>> {
        let resp = self.client.get(self.books_url()).send().await?;
        let books: Vec<Book> = decode(resp, None).await?;
        debug!(count = books.len(), "fetched books");
        Ok(books)
    }

    async fn fetch_one(&self, id: BookId) -> CatalogResult<Book> {
        let resp = self.client.get(self.book_url(id)).send().await?;
        decode(resp, Some(id)).await
    }

    async fn update_status(&self, id: BookId, status: ReadingStatus) -> CatalogResult<()> {
        let resp = self
            .client
            .put(self.book_url(id))
            .json(&BookPatch::status(status))
            .send()
            .await?;
        check_status(resp, Some(id)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(
    resp: reqwest::Response,
    id: Option<BookId>,
) -> CatalogResult<T> {
    let resp = check_status(resp, id).await?;
    Ok(resp.json::<T>().await?)
}

/// Maps 404 to `NotFound` when a book id is involved, any other non-2xx to
/// `HttpStatus`.
async fn check_status(
    resp: reqwest::Response,
    id: Option<BookId>,
) -> CatalogResult<reqwest::Response> {
    let status = resp.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(CatalogError::NotFound(id));
        }
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!(%status, book_id = ?id, "books API returned an error");
        return Err(CatalogError::HttpStatus { status, body });
    }

    Ok(resp)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
