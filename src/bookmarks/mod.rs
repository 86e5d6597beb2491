//! Per-document bookmarks

mod set;
mod store;

pub use set::BookmarkSet;
pub use store::{storage_key, BookmarkRepository};
