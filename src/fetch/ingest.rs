//! Content ingestion

use super::client::DocumentSource;

/// Shown in place of a document that could not be fetched
pub const PLACEHOLDER_PARAGRAPHS: [&str; 2] = [
    "문서를 불러오는데 실패했습니다.",
    "잠시 후 다시 시도해주세요.",
];

/// Split plain text into paragraphs, one per line, dropping blank lines
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn placeholder_paragraphs() -> Vec<String> {
    PLACEHOLDER_PARAGRAPHS.iter().map(|p| p.to_string()).collect()
}

/// Fetch `url` and split it into paragraphs.
///
/// Fetch failures are logged and replaced with the placeholder paragraphs.
pub async fn load_paragraphs(source: &dyn DocumentSource, url: &str) -> Vec<String> {
    match source.fetch_text(url).await {
        Ok(text) => split_paragraphs(&text),
        Err(e) => {
            tracing::warn!("Failed to fetch document content from {}: {}", url, e);
            placeholder_paragraphs()
        }
    }
}
