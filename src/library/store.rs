//! Library persistence

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::book::{next_id, seed_books, Book, BookPatch};
use crate::db::KvStore;

/// Key holding the serialized book list
pub const STORAGE_KEY: &str = "korean-lib-books";

/// Repository for the book list.
///
/// The whole list is stored as one JSON value and every mutation rewrites it.
pub struct BookRepository<'a> {
    kv: KvStore<'a>,
}

impl<'a> BookRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            kv: KvStore::new(pool),
        }
    }

    /// Load the book list, falling back to the seed library when nothing
    /// usable is stored
    pub async fn list(&self) -> Result<Vec<Book>> {
        let raw = self.kv.get(STORAGE_KEY).await?;
        Ok(decode(raw.as_deref()))
    }

    /// Replace the whole list
    pub async fn replace_all(&self, books: &[Book]) -> Result<()> {
        self.kv.put(STORAGE_KEY, &encode(books)?).await?;
        tracing::debug!("Saved library with {} books", books.len());
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Book>> {
        let books = self.list().await?;
        Ok(books.into_iter().find(|book| book.id == id))
    }

    /// Books whose title or author contains `term`; a blank term matches all
    pub async fn search(&self, term: &str) -> Result<Vec<Book>> {
        let books = self.list().await?;
        let term = term.trim();
        if term.is_empty() {
            return Ok(books);
        }
        Ok(books.into_iter().filter(|book| book.matches(term)).collect())
    }

    /// Append a placeholder book with the next numeric id
    pub async fn add_new(&self) -> Result<Book> {
        self.kv
            .modify(STORAGE_KEY, |raw| {
                let mut books = decode(raw.as_deref());
                let book = Book::placeholder(next_id(&books));
                books.push(book.clone());
                Ok((Some(encode(&books)?), book))
            })
            .await
    }

    /// Apply `patch` to a book. Returns `None` when the id is unknown.
    pub async fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>> {
        let id = id.to_owned();
        self.kv
            .modify(STORAGE_KEY, move |raw| {
                let mut books = decode(raw.as_deref());
                let Some(book) = books.iter_mut().find(|book| book.id == id) else {
                    return Ok((None, None));
                };
                book.apply(patch);
                let updated = book.clone();
                Ok((Some(encode(&books)?), Some(updated)))
            })
            .await
    }

    /// Remove a book. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_owned();
        self.kv
            .modify(STORAGE_KEY, move |raw| {
                let mut books = decode(raw.as_deref());
                let before = books.len();
                books.retain(|book| book.id != id);
                if books.len() == before {
                    return Ok((None, false));
                }
                Ok((Some(encode(&books)?), true))
            })
            .await
    }
}

fn decode(raw: Option<&str>) -> Vec<Book> {
    let Some(raw) = raw else {
        return seed_books();
    };

    match serde_json::from_str::<Vec<Book>>(raw) {
        Ok(books) => books,
        Err(e) => {
            tracing::warn!("Stored library is unreadable, using seed books: {}", e);
            seed_books()
        }
    }
}

fn encode(books: &[Book]) -> Result<String> {
    serde_json::to_string(books).context("Failed to serialize library")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_list_falls_back_to_seed() {
        let pool = create_memory_pool().await.unwrap();
        let repo = BookRepository::new(&pool);

        assert_eq!(repo.list().await.unwrap(), seed_books());

        KvStore::new(&pool).put(STORAGE_KEY, "{not json").await.unwrap();
        assert_eq!(repo.list().await.unwrap(), seed_books());
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let pool = create_memory_pool().await.unwrap();
        let repo = BookRepository::new(&pool);

        let added = repo.add_new().await.unwrap();
        assert_eq!(added.id, "4");
        assert_eq!(added.title, "새 도서");
        assert_eq!(repo.list().await.unwrap().len(), 4);

        let patch = BookPatch {
            title: Some("날개".to_string()),
            author: Some("이상".to_string()),
            ..Default::default()
        };
        let updated = repo.update("4", patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "날개");
        assert_eq!(repo.get("4").await.unwrap().unwrap().author, "이상");

        assert!(repo.update("99", BookPatch::default()).await.unwrap().is_none());

        assert!(repo.delete("4").await.unwrap());
        assert!(!repo.delete("4").await.unwrap());
        assert!(repo.get("4").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_everything_keeps_empty_list() {
        let pool = create_memory_pool().await.unwrap();
        let repo = BookRepository::new(&pool);

        repo.replace_all(&[]).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert_eq!(repo.add_new().await.unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_search() {
        let pool = create_memory_pool().await.unwrap();
        let repo = BookRepository::new(&pool);

        let found = repo.search("김소월").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "진달래꽃");

        assert_eq!(repo.search("날").await.unwrap().len(), 1);
        assert_eq!(repo.search("  ").await.unwrap().len(), 3);
        assert!(repo.search("없는 책").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_get_distinct_ids() {
        let pool = create_memory_pool().await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move { BookRepository::new(&pool).add_new().await })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_by_key(|id| id.parse::<u32>().unwrap());
        let expected: Vec<String> = (4..14).map(|n| n.to_string()).collect();
        assert_eq!(ids, expected);

        let books = BookRepository::new(&pool).list().await.unwrap();
        assert_eq!(books.len(), 13);
    }
}
