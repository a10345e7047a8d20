//! KvStore trait: the abstract interface for durable key-value persistence.
//!
//! This trait keeps the feedback and session stores storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use crate::error::Result;

/// Async interface over a string-keyed, string-valued medium.
///
/// # Design Notes
///
/// - Each call is atomic with respect to other calls on the same store.
/// - There is no multi-key transaction; callers write whole documents.
/// - Two handles over the same file do not observe each other's caches,
///   because there are none: every `get` reads the medium.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// All keys, in ascending order.
    async fn keys(&self) -> Result<Vec<String>>;
}
