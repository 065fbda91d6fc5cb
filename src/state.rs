use std::sync::Arc;
use std::time::Instant;

use crate::store::BookStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: Arc<BookStore>,
}

impl AppState {
    pub fn new(store: BookStore) -> Self {
        Self {
            started_at: Instant::now(),
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
