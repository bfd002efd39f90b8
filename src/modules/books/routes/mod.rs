use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use booklens_http::error::AppError;

use super::aggregate::SearchError;
use super::models::{
    AuthorResponse, FieldError, SearchBody, SearchMode, SearchOutcome, TitleResponse,
};
use super::service::BookSearch;

/// Routes mounted under `/api/books`.
pub fn router(search: Arc<BookSearch>) -> Router {
    Router::new()
        .route("/author", post(search_by_author))
        .route("/title", post(search_by_title))
        .route("/health", get(health_check))
        .with_state(search)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn search_by_author(
    State(search): State<Arc<BookSearch>>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = body
        .into_request(SearchMode::Author, search.max_extra_pages())
        .map_err(invalid_request)?;

    match search.by_author(&request).await.map_err(upstream_failure)? {
        SearchOutcome::Found(result) => {
            Ok(Json(AuthorResponse::new(request.author, result)).into_response())
        }
        SearchOutcome::NoContent { .. } => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn search_by_title(
    State(search): State<Arc<BookSearch>>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = body
        .into_request(SearchMode::Title, search.max_extra_pages())
        .map_err(invalid_request)?;

    match search.by_title(&request).await.map_err(upstream_failure)? {
        SearchOutcome::Found(result) => {
            Ok(Json(TitleResponse::new(request.title, result)).into_response())
        }
        SearchOutcome::NoContent { .. } => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

fn invalid_request(errors: Vec<FieldError>) -> AppError {
    AppError::validation(
        errors.iter().map(FieldError::to_json).collect(),
        "invalid search request",
    )
}

fn upstream_failure(err: SearchError) -> AppError {
    tracing::error!(error = %err, "book search failed");
    AppError::upstream(err.to_string())
}
