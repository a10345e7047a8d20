//! # Campus Voice Store
//!
//! Durable key-value persistence for Campus Voice. The stores in the
//! `campus-voice` crate write whole JSON documents under fixed keys; this
//! crate only moves strings in and out of a medium.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait every backend implements
//! - [`SqliteStore`] - SQLite-backed storage that survives restarts
//! - [`MemoryStore`] - Volatile storage for tests and demos
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_voice_store::{KvStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("campus-voice.db").unwrap();
//!     store.set("greeting", "hello").await.unwrap();
//!     assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: `set` replaces the previous value atomically.
//! - **Absent is not an error**: `get` on a missing key returns `None`.
//! - **Blocking isolation**: SQLite calls run on tokio's blocking pool.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KvStore;
