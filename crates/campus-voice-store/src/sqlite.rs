//! SQLite implementation of the KvStore trait.
//!
//! This is the durable storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::KvStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_owned();

        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_owned();
        let value = value.to_owned();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now_millis()],
            )?;
            tracing::trace!(%key, bytes = value.len(), "wrote kv entry");
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_owned();

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        let key = key.to_owned();

        self.with_conn(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM kv_entries WHERE key = ?1)",
                params![key],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(keys)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SqliteStore::open_memory().unwrap();

        assert_eq!(store.get("campusVoiceUser").await.unwrap(), None);

        store.set("campusVoiceUser", r#"{"id":"1"}"#).await.unwrap();
        let value = store.get("campusVoiceUser").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"id":"1"}"#));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = SqliteStore::open_memory().unwrap();

        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.keys().await.unwrap(), vec!["k"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SqliteStore::open_memory().unwrap();

        store.set("k", "v").await.unwrap();
        assert!(store.contains("k").await.unwrap());

        store.remove("k").await.unwrap();
        assert!(!store.contains("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);

        // Missing key
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_value_is_present() {
        let store = SqliteStore::open_memory().unwrap();
        store.set("k", "").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus-voice.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("campusVoiceFeedbacks", "[]").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("campusVoiceFeedbacks").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
