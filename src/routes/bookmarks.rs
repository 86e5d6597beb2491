//! Bookmark API routes

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::bookmarks::BookmarkRepository;
use crate::error::Result;
use crate::state::AppState;

/// Create the bookmarks router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:title", get(get_bookmarks))
        .route("/:title/toggle", post(toggle_bookmark))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarksResponse {
    pub title: String,
    pub pages: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub page: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub title: String,
    pub page: u32,
    pub bookmarked: bool,
    pub pages: Vec<u32>,
}

async fn get_bookmarks(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<BookmarksResponse>> {
    let set = BookmarkRepository::new(state.db()).load(&title).await?;
    Ok(Json(BookmarksResponse {
        title,
        pages: set.into(),
    }))
}

async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    let (set, bookmarked) = BookmarkRepository::new(state.db())
        .toggle(&title, request.page)
        .await?;
    tracing::debug!(
        "Bookmark {} page {} for {}",
        if bookmarked { "added" } else { "removed" },
        request.page,
        title
    );
    Ok(Json(ToggleResponse {
        title,
        page: request.page,
        bookmarked,
        pages: set.into(),
    }))
}
