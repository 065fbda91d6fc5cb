use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::catalog::filter::{FilterCriteria, GenreFilter, RatingRange, StatusFilter};
use crate::catalog::model::{Book, BookId, BookPatch, NewBook};
use crate::response::AppError;
use crate::state::AppState;

/// Query string of `GET /api/books`.
///
/// A `minRating` that does not parse as a number is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BooksQuery {
    search: Option<String>,
    genre: Option<String>,
    status: Option<String>,
    #[serde(rename = "minRating")]
    min_rating: Option<String>,
}

impl BooksQuery {
    fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search.unwrap_or_default(),
            genre: self
                .genre
                .as_deref()
                .map(GenreFilter::parse)
                .unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(StatusFilter::parse)
                .unwrap_or_default(),
            rating_range: self
                .min_rating
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|min| min.is_finite())
                .map(RatingRange::at_least)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

pub async fn cors_check() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "CORS is working!",
    })
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> Json<Vec<Book>> {
    let criteria = query.into_criteria();
    Json(state.store().list(&criteria).await)
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(new_book) = payload.map_err(|err| AppError::bad_request(err.body_text()))?;
    let book = state.store().insert(new_book).await?;
    tracing::info!(book_id = book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    state
        .store()
        .get(id)
        .await
        .map(Json)
        .ok_or_else(AppError::book_not_found)
}

pub async fn update_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    if state.store().get(id).await.is_none() {
        return Err(AppError::book_not_found());
    }
    let Json(patch) = payload.map_err(|err| AppError::bad_request(err.body_text()))?;

    let book = state
        .store()
        .update(id, patch)
        .await?
        .ok_or_else(AppError::book_not_found)?;
    tracing::info!(book_id = id, status = %book.status, "book updated");
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let book = state
        .store()
        .delete(id)
        .await?
        .ok_or_else(AppError::book_not_found)?;
    tracing::info!(book_id = id, "book deleted");
    Ok(Json(book))
}

fn book_id(id: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    let Path(id) = id.map_err(|err| AppError::bad_request(err.body_text()))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::ReadingStatus;

    #[test]
    fn empty_query_means_no_constraint() {
        assert_eq!(BooksQuery::default().into_criteria(), FilterCriteria::default());
    }

    #[test]
    fn query_maps_onto_criteria() {
        let query = BooksQuery {
            search: Some("tolkien".into()),
            genre: Some("Fantasy".into()),
            status: Some("reading".into()),
            min_rating: Some("4".into()),
        };
        let criteria = query.into_criteria();
        assert_eq!(criteria.search_term, "tolkien");
        assert_eq!(criteria.genre, GenreFilter::Exact("Fantasy".into()));
        assert_eq!(criteria.status, StatusFilter::Is(ReadingStatus::Reading));
        assert!(criteria.rating_range.contains(5.0));
        assert!(!criteria.rating_range.contains(3.9));
    }

    #[test]
    fn unparsable_min_rating_is_ignored() {
        let query = BooksQuery {
            min_rating: Some("high".into()),
            ..Default::default()
        };
        assert_eq!(query.into_criteria().rating_range, RatingRange::Any);
    }
}
