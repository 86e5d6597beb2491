//! Library API routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::layout::layout_book;
use crate::error::{AppError, Result};
use crate::fetch::load_paragraphs;
use crate::library::{Book, BookPatch, BookRepository};
use crate::state::AppState;

/// Create the books router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(add_book).put(replace_books))
        .route("/:id", get(get_book).patch(update_book).delete(delete_book))
        .route("/:id/content", get(book_content))
        .route("/:id/layout", post(layout_book))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// Paragraphs of a book, with where they came from
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: String,
    pub title: String,
    pub source: ContentSource,
    pub paragraphs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Inline,
    Document,
}

/// Resolve the paragraphs to display for `book`.
///
/// Books linked to an external document load it through the configured
/// source; the inline content is used otherwise.
pub async fn book_paragraphs(state: &AppState, book: &Book) -> (ContentSource, Vec<String>) {
    match book.document_url() {
        Some(url) => (
            ContentSource::Document,
            load_paragraphs(state.source(), url).await,
        ),
        None => (ContentSource::Inline, book.content.clone()),
    }
}

pub(super) async fn find_book(state: &AppState, id: &str) -> Result<Book> {
    BookRepository::new(state.db())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book not found: {}", id)))
}

/// List books, optionally filtered by title or author
async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Book>>> {
    let repo = BookRepository::new(state.db());
    let books = match params.q {
        Some(term) => repo.search(&term).await?,
        None => repo.list().await?,
    };
    Ok(Json(books))
}

/// Append a placeholder book
async fn add_book(State(state): State<AppState>) -> Result<(StatusCode, Json<Book>)> {
    let book = BookRepository::new(state.db()).add_new().await?;
    tracing::info!("Added book {}", book.id);
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace the whole library
async fn replace_books(
    State(state): State<AppState>,
    Json(books): Json<Vec<Book>>,
) -> Result<Json<Vec<Book>>> {
    BookRepository::new(state.db()).replace_all(&books).await?;
    Ok(Json(books))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Book>> {
    Ok(Json(find_book(&state, &id).await?))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>> {
    let book = BookRepository::new(state.db())
        .update(&id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book not found: {}", id)))?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if BookRepository::new(state.db()).delete(&id).await? {
        tracing::info!("Deleted book {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Book not found: {}", id)))
    }
}

/// Paragraphs the reader shows for a book
async fn book_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentResponse>> {
    let book = find_book(&state, &id).await?;
    let (source, paragraphs) = book_paragraphs(&state, &book).await;
    let video_url = book.video().map(str::to_string);
    Ok(Json(ContentResponse {
        video_url,
        id: book.id,
        title: book.title,
        source,
        paragraphs,
    }))
}
