//! Key-value blob storage

use anyhow::Result;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

/// Whole-value key-value store on top of SQLite.
///
/// Writes always replace the complete value; there are no partial updates.
pub struct KvStore<'a> {
    pool: &'a SqlitePool,
}

async fn fetch_value<'e, E>(executor: E, key: &str) -> Result<Option<String>>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|(value,)| value))
}

async fn store_value<'e, E>(executor: E, key: &str, value: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(executor)
    .await?;

    Ok(())
}

impl<'a> KvStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the raw value stored under `key`
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        fetch_value(self.pool, key).await
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        store_value(self.pool, key, value).await
    }

    /// Read, transform and write back the value under `key` as one
    /// transaction.
    ///
    /// `f` gets the current value and returns the value to store (`None`
    /// leaves it untouched) along with its result. The write lock is taken up
    /// front with `BEGIN IMMEDIATE`, so concurrent modifications of the same
    /// key run one after another instead of overwriting each other.
    pub async fn modify<R, F>(&self, key: &str, f: F) -> Result<R>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, R)> + Send + 'static,
        R: Send + 'static,
    {
        let pool = self.pool.clone();
        let key = key.to_owned();

        // Own task, so a dropped caller cannot return the connection to the
        // pool mid-transaction
        tokio::spawn(async move {
            let mut conn = pool.acquire().await?;
            sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

            let result = modify_locked(&mut conn, &key, f).await;
            let finish = if result.is_ok() { "COMMIT" } else { "ROLLBACK" };
            if let Err(e) = sqlx::query(finish).execute(&mut *conn).await {
                sqlx::query("ROLLBACK").execute(&mut *conn).await.ok();
                return Err(e.into());
            }

            result
        })
        .await?
    }
}

async fn modify_locked<R, F>(conn: &mut SqliteConnection, key: &str, f: F) -> Result<R>
where
    F: FnOnce(Option<String>) -> Result<(Option<String>, R)>,
{
    let current = fetch_value(&mut *conn, key).await?;
    let (next, output) = f(current)?;
    if let Some(value) = next {
        store_value(&mut *conn, key, &value).await?;
    }
    Ok(output)
}
