//! Route modules for the Folio server

pub mod bookmarks;
pub mod books;
pub mod health;
pub mod layout;
pub mod proxy;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .route("/api/doc-proxy", get(proxy::doc_proxy))
        .nest("/api/v1/books", books::router())
        .nest("/api/v1/bookmarks", bookmarks::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
