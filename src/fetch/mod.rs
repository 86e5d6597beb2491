//! Remote document fetching
//!
//! Rewrites shared-document edit links to their plain-text export form,
//! fetches them, and splits the text into reader paragraphs.

mod client;
mod export;
mod ingest;

pub use client::{DocumentFetcher, DocumentSource, FetchError, ProxyClient};
pub use export::export_url;
pub use ingest::{load_paragraphs, placeholder_paragraphs, split_paragraphs, PLACEHOLDER_PARAGRAPHS};
