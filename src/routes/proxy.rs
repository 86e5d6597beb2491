//! Document export proxy
//!
//! `GET /api/doc-proxy?url=<edit url>` rewrites the URL to its plain-text
//! export form, fetches it server-side and returns the body as text.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::fetch::FetchError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
}

/// Errors surfaced to proxy callers as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Failed to fetch document")]
    Upstream(StatusCode),

    #[error("Internal Server Error")]
    Internal,
}

#[derive(Serialize)]
struct ProxyErrorBody {
    error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::MissingUrl => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(status) => status,
            ProxyError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ProxyErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<FetchError> for ProxyError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Upstream { status } => StatusCode::from_u16(status)
                .map(ProxyError::Upstream)
                .unwrap_or(ProxyError::Internal),
            FetchError::Transport(e) => {
                tracing::error!("Doc proxy transport failure: {}", e);
                ProxyError::Internal
            }
        }
    }
}

/// Fetch a document's plain-text export
pub async fn doc_proxy(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, ProxyError> {
    let url = params
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ProxyError::MissingUrl)?;

    let text = state.fetcher().fetch_export(&url).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_forwarded() {
        let err = ProxyError::from(FetchError::Upstream { status: 404 });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = ProxyError::from(FetchError::Upstream { status: 403 });
        assert_eq!(err.to_string(), "Failed to fetch document");
    }

    #[test]
    fn test_missing_url_is_bad_request() {
        assert_eq!(
            ProxyError::MissingUrl.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
