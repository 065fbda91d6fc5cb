use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    books: usize,
    uptime: u64,
}

async fn root(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        books: state.store().len().await,
        uptime: state.uptime_seconds(),
    })
}
