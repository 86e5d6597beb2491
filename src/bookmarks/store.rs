//! Bookmark persistence

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::set::BookmarkSet;
use crate::db::KvStore;

/// Storage key for a title's bookmarks
pub fn storage_key(title: &str) -> String {
    format!("bookmarks-{}", title)
}

/// Repository for per-title bookmark sets
pub struct BookmarkRepository<'a> {
    kv: KvStore<'a>,
}

impl<'a> BookmarkRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            kv: KvStore::new(pool),
        }
    }

    /// Load the bookmarks for `title`. Missing or unreadable state is empty.
    pub async fn load(&self, title: &str) -> Result<BookmarkSet> {
        let key = storage_key(title);
        let raw = self.kv.get(&key).await?;
        Ok(decode(&key, raw.as_deref()))
    }

    /// Toggle `page` and persist the result.
    ///
    /// Runs as one read-modify-write, so concurrent toggles on the same title
    /// all land.
    pub async fn toggle(&self, title: &str, page: u32) -> Result<(BookmarkSet, bool)> {
        let key = storage_key(title);
        self.kv
            .modify(&storage_key(title), move |raw| {
                let mut set = decode(&key, raw.as_deref());
                let added = set.toggle(page);
                Ok((Some(encode(&set)?), (set, added)))
            })
            .await
    }
}

fn decode(key: &str, raw: Option<&str>) -> BookmarkSet {
    let Some(raw) = raw else {
        return BookmarkSet::new();
    };

    match serde_json::from_str(raw) {
        Ok(set) => set,
        Err(e) => {
            tracing::warn!("Ignoring unreadable bookmarks under {}: {}", key, e);
            BookmarkSet::new()
        }
    }
}

fn encode(set: &BookmarkSet) -> Result<String> {
    serde_json::to_string(set).context("Failed to serialize bookmarks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_toggle_persists() {
        let pool = create_memory_pool().await.unwrap();
        let repo = BookmarkRepository::new(&pool);

        assert!(repo.load("진달래꽃").await.unwrap().is_empty());

        let (set, added) = repo.toggle("진달래꽃", 3).await.unwrap();
        assert!(added);
        assert_eq!(set.pages(), &[3]);

        repo.toggle("진달래꽃", 1).await.unwrap();
        assert_eq!(repo.load("진달래꽃").await.unwrap().pages(), &[1, 3]);

        let (set, added) = repo.toggle("진달래꽃", 3).await.unwrap();
        assert!(!added);
        assert_eq!(set.pages(), &[1]);

        assert!(repo.load("운수 좋은 날").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_state_is_empty() {
        let pool = create_memory_pool().await.unwrap();
        KvStore::new(&pool)
            .put(&storage_key("날개"), "not a list")
            .await
            .unwrap();

        let repo = BookmarkRepository::new(&pool);
        assert!(repo.load("날개").await.unwrap().is_empty());

        let (set, _) = repo.toggle("날개", 2).await.unwrap();
        assert_eq!(set.pages(), &[2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_all_persist() {
        let pool = create_memory_pool().await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|page| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    BookmarkRepository::new(&pool).toggle("메밀꽃 필 무렵", page).await
                })
            })
            .collect();
        for handle in handles {
            let (_, added) = handle.await.unwrap().unwrap();
            assert!(added);
        }

        let set = BookmarkRepository::new(&pool)
            .load("메밀꽃 필 무렵")
            .await
            .unwrap();
        assert_eq!(set.pages(), (0..20).collect::<Vec<u32>>().as_slice());
    }
}
