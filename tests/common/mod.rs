#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use serde_json::json;

use book_tracker::state::AppState;
use book_tracker::store::BookStore;

pub fn seed_file(path: &Path) {
    let data = json!({
        "books": [
            {
                "id": 1,
                "title": "The Hobbit",
                "author": "J.R.R. Tolkien",
                "cover": "https://covers.test/hobbit.jpg",
                "rating": 4.7,
                "pages": 310,
                "genre": "Fantasy",
                "status": "read"
            },
            {
                "id": 2,
                "title": "Dune",
                "author": "Frank Herbert",
                "cover": "https://covers.test/dune.jpg",
                "rating": 4.2,
                "pages": 412,
                "genre": "Science Fiction",
                "status": "want-to-read"
            },
            {
                "id": 3,
                "title": "Laskar Pelangi",
                "author": "Andrea Hirata",
                "cover": "https://covers.test/laskar.jpg",
                "rating": 3.5,
                "pages": 529,
                "genre": "Fiction",
                "status": "reading"
            },
            {
                "id": 4,
                "title": "The Silmarillion",
                "author": "J.R.R. Tolkien",
                "cover": "https://covers.test/silmarillion.jpg",
                "rating": 2.4,
                "pages": 365,
                "genre": "Fantasy",
                "status": "want-to-read"
            }
        ]
    });
    std::fs::write(path, serde_json::to_vec_pretty(&data).unwrap()).unwrap();
}

/// Router over a seeded data file inside `dir`.
pub async fn create_test_app(dir: &Path) -> Router {
    let path = dir.join("books.json");
    seed_file(&path);
    let store = BookStore::open(&path).await.unwrap();
    book_tracker::app_with_state(AppState::new(store), &["http://localhost:5173".to_string()])
}

/// Serves a seeded router on an ephemeral local port and returns its base URL.
pub async fn spawn_server(dir: &Path) -> String {
    let app = create_test_app(dir).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
