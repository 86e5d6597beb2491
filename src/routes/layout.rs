//! Server-side pagination

use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::books::{book_paragraphs, find_book};
use crate::bookmarks::BookmarkRepository;
use crate::error::{AppError, Result};
use crate::reader::{
    ColumnMode, HostRect, ReaderCommand, ReaderSession, ReaderSnapshot, TextFlowOracle, Theme,
    MAX_SURFACE_PX,
};
use crate::state::AppState;

/// Reading surface and preferences to paginate for
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub width: f64,
    pub height: f64,
    pub font_size: Option<u32>,
    pub line_height: Option<f32>,
    #[serde(default)]
    pub column_mode: ColumnMode,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub page: u32,
}

/// Paginate a book for the given surface and return the reader snapshot
pub async fn layout_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<ReaderSnapshot>> {
    let max = MAX_SURFACE_PX as f64;
    let in_range = |v: f64| (0.0..=max).contains(&v);
    if !in_range(request.width) || !in_range(request.height) {
        return Err(AppError::BadRequest(format!(
            "width and height must be between 0 and {}",
            MAX_SURFACE_PX
        )));
    }

    let book = find_book(&state, &id).await?;
    let (_, paragraphs) = book_paragraphs(&state, &book).await;
    let bookmarks = BookmarkRepository::new(state.db()).load(&book.title).await?;

    let now = Instant::now();
    let mut session = ReaderSession::new(state.config().layout.timings());
    session.set_column_mode(request.column_mode, now);
    if let Some(font_size) = request.font_size {
        session.set_font_size(font_size, now);
    }
    if let Some(line_height) = request.line_height {
        session.set_line_height(line_height, now);
    }
    session.set_theme(request.theme);
    session.set_bookmarks(bookmarks);
    session.mount(HostRect::new(request.width, request.height), now);
    session.replace_content(book.title, paragraphs, now);

    let mut oracle = TextFlowOracle::default();
    session.drain(now, &mut oracle);
    session.handle(ReaderCommand::Goto(request.page));

    let snapshot = session.snapshot();
    tracing::debug!(
        "Paginated book {} into {} pages (settled: {})",
        id,
        snapshot.page.total_pages,
        snapshot.settled
    );
    Ok(Json(snapshot))
}
