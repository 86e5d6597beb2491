//! Book library
//!
//! Book records with inline content or an external document link, persisted
//! as a single list.

mod book;
mod store;

pub use book::{next_id, seed_books, Book, BookPatch};
pub use store::{BookRepository, STORAGE_KEY};
