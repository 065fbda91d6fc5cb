//! Filter & status engine.
//!
//! Owns the working collection and the current criteria for one view session.
//! The lock is only taken to read or patch local state and is never held
//! across a request, so independent status changes can be in flight together.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::client::{BookApi, CatalogResult};
use crate::catalog::filter::{filter_books, genres_of, CriteriaUpdate, FilterCriteria};
use crate::catalog::model::{Book, BookId, ReadingStatus};

#[derive(Debug, Default)]
struct ViewState {
    books: Vec<Book>,
    criteria: FilterCriteria,
}

pub struct FilterEngine<A> {
    api: A,
    state: RwLock<ViewState>,
}

impl<A: BookApi> FilterEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub fn with_books(api: A, books: Vec<Book>) -> Self {
        let engine = Self::new(api);
        engine.load(books);
        engine
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the working collection with a fresh copy from the API.
    ///
    /// On failure the previous collection stays in place.
    pub async fn refresh(&self) -> CatalogResult<usize> {
        let books = match self.api.fetch_all().await {
            Ok(books) => books,
            Err(err) => {
                warn!(error = %err, "failed to fetch books");
                return Err(err);
            }
        };
        let count = books.len();
        self.load(books);
        info!(count, "working collection refreshed");
        Ok(count)
    }

    pub fn load(&self, books: Vec<Book>) {
        self.state.write().books = books;
    }

    pub fn set_criteria(&self, update: CriteriaUpdate) {
        let mut state = self.state.write();
        state.criteria.apply(update);
        debug!(criteria = ?state.criteria, "criteria updated");
    }

    pub fn clear_criteria(&self) {
        self.state.write().criteria = FilterCriteria::default();
    }

    pub fn visible_books(&self) -> Vec<Book> {
        let state = self.state.read();
        filter_books(&state.books, &state.criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        let state = self.state.read();
        state
            .books
            .iter()
            .filter(|book| state.criteria.matches(book))
            .count()
    }

    pub fn available_genres(&self) -> Vec<String> {
        genres_of(&self.state.read().books)
    }

    pub fn books(&self) -> Vec<Book> {
        self.state.read().books.clone()
    }

    pub fn book(&self, id: BookId) -> Option<Book> {
        self.state.read().books.iter().find(|b| b.id == id).cloned()
    }

    /// Sends the status change and, once the API accepts it, patches the
    /// local entry. A failed request leaves local state untouched.
    ///
    /// The request is issued even when `id` is not in the working collection.
    pub async fn set_status(&self, id: BookId, status: ReadingStatus) -> CatalogResult<()> {
        if let Err(err) = self.api.update_status(id, status).await {
            warn!(book_id = id, %status, error = %err, "status update rejected");
            return Err(err);
        }

        let mut state = self.state.write();
        match state.books.iter_mut().find(|b| b.id == id) {
            Some(book) => {
                book.status = status;
                info!(book_id = id, %status, "status updated");
            }
            None => debug!(book_id = id, "updated book is not in the working collection"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;
    use tokio::sync::Barrier;

    use super::*;
    use crate::catalog::client::CatalogError;
    use crate::catalog::filter::{GenreFilter, RatingRange};

    #[derive(Default)]
    struct FakeApi {
        books: Vec<Book>,
        fail: AtomicBool,
        updates: Mutex<Vec<(BookId, ReadingStatus)>>,
        gate: Option<Barrier>,
    }

    fn unavailable() -> CatalogError {
        CatalogError::HttpStatus {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        }
    }

    impl BookApi for FakeApi {
        async fn fetch_all(&self) -> CatalogResult<Vec<Book>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            Ok(self.books.clone())
        }

        async fn fetch_one(&self, id: BookId) -> CatalogResult<Book> {
            self.books
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .ok_or(CatalogError::NotFound(id))
        }

        async fn update_status(&self, id: BookId, status: ReadingStatus) -> CatalogResult<()> {
            self.updates.lock().push((id, status));
            if let Some(gate) = &self.gate {
                gate.wait().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(unavailable());
            }
            Ok(())
        }
    }

    fn book(id: BookId, genre: &str, rating: f64) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Author".into(),
            cover: String::new(),
            rating,
            pages: 120,
            genre: genre.into(),
            status: ReadingStatus::WantToRead,
        }
    }

    fn sample() -> Vec<Book> {
        vec![book(1, "Fiction", 3.5), book(2, "Drama", 5.0), book(3, "Fiction", 2.0)]
    }

    #[tokio::test]
    async fn refresh_replaces_collection() {
        let api = FakeApi {
            books: sample(),
            ..Default::default()
        };
        let engine = FilterEngine::with_books(api, vec![book(9, "Poetry", 4.0)]);

        assert_eq!(engine.refresh().await.unwrap(), 3);
        let ids: Vec<_> = engine.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_collection() {
        let api = FakeApi {
            books: sample(),
            fail: AtomicBool::new(true),
            ..Default::default()
        };
        let engine = FilterEngine::with_books(api, vec![book(9, "Poetry", 4.0)]);

        let err = engine.refresh().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(engine.books(), vec![book(9, "Poetry", 4.0)]);
    }

    #[test]
    fn visible_books_is_stable_between_calls() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());
        engine.set_criteria(CriteriaUpdate::default().genre(GenreFilter::parse("Fiction")));

        let first = engine.visible_books();
        let second = engine.visible_books();
        assert_eq!(first, second);
        assert_eq!(first.len(), engine.visible_count());
    }

    #[test]
    fn rating_range_selects_single_book() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());
        engine.set_criteria(CriteriaUpdate::default().rating(RatingRange::between(3.0, 3.9)));

        let visible = engine.visible_books();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn genres_follow_working_collection() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());
        assert_eq!(engine.available_genres(), vec!["all", "Fiction", "Drama"]);

        engine.load(Vec::new());
        assert_eq!(engine.available_genres(), vec!["all"]);
    }

    #[test]
    fn clear_criteria_restores_defaults() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());
        engine.set_criteria(CriteriaUpdate::default().search("nothing matches this"));
        assert_eq!(engine.visible_count(), 0);

        engine.clear_criteria();
        assert_eq!(engine.visible_count(), 3);
    }

    #[tokio::test]
    async fn status_is_patched_after_confirmation() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());

        engine.set_status(2, ReadingStatus::Reading).await.unwrap();

        assert_eq!(engine.book(2).unwrap().status, ReadingStatus::Reading);
        assert_eq!(engine.book(1).unwrap().status, ReadingStatus::WantToRead);
    }

    #[tokio::test]
    async fn failed_status_change_leaves_local_state() {
        let api = FakeApi {
            fail: AtomicBool::new(true),
            ..Default::default()
        };
        let engine = FilterEngine::with_books(api, sample());

        let err = engine.set_status(2, ReadingStatus::Reading).await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(engine.book(2).unwrap().status, ReadingStatus::WantToRead);
        assert_eq!(engine.api().updates.lock().len(), 1);
    }

    #[tokio::test]
    async fn unknown_book_still_hits_the_api() {
        let engine = FilterEngine::with_books(FakeApi::default(), sample());

        engine.set_status(99, ReadingStatus::Read).await.unwrap();

        assert_eq!(engine.books(), sample());
        assert_eq!(*engine.api().updates.lock(), vec![(99, ReadingStatus::Read)]);
    }

    #[tokio::test]
    async fn concurrent_status_changes_patch_their_own_book() {
        let api = FakeApi {
            gate: Some(Barrier::new(2)),
            ..Default::default()
        };
        let engine = FilterEngine::with_books(api, sample());

        // Both requests must be outstanding before either can resolve.
        let (first, second) = tokio::join!(
            engine.set_status(1, ReadingStatus::Read),
            engine.set_status(3, ReadingStatus::Reading),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(engine.book(1).unwrap().status, ReadingStatus::Read);
        assert_eq!(engine.book(2).unwrap().status, ReadingStatus::WantToRead);
        assert_eq!(engine.book(3).unwrap().status, ReadingStatus::Reading);
    }
}
