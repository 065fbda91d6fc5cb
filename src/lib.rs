pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;
use crate::store::{BookStore, StoreResult};

/// Builds the books API router for `config`, loading its data file.
pub async fn create_app(config: &Config) -> StoreResult<axum::Router> {
    let store = BookStore::open(&config.data_file).await?;
    Ok(app_with_state(AppState::new(store), &config.cors_origins))
}

pub fn app_with_state(state: AppState, cors_origins: &[String]) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(routes::cors_layer(cors_origins))
}
