//! # Campus Voice
//!
//! State and persistence for a campus feedback portal: students submit
//! feedback, administrators triage and resolve it, and both exchange
//! threaded comments.
//!
//! ## Overview
//!
//! Two stores share one key-value medium:
//!
//! - **[`SessionStore`]**: the single active identity. Sign-in and sign-up
//!   are mocked with an artificial delay; the identity survives restarts.
//! - **[`FeedbackStore`]**: the feedback collection and its comment threads,
//!   persisted in full on every mutation and seeded with example items on
//!   first start.
//!
//! Both publish change events over broadcast channels so a UI layer can
//! re-render without polling. [`Portal`] bundles the two and adds the role
//! checks pages rely on.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use campus_voice::{Portal, PortalConfig};
//! use campus_voice::core::{Category, FeedbackForm};
//! use campus_voice::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("campus-voice.db").unwrap();
//!     let portal = Portal::open(store, PortalConfig::default()).await.unwrap();
//!
//!     portal.session().sign_in("jane.smith@campus.com", "secret").await.unwrap();
//!
//!     let item = portal
//!         .submit(&FeedbackForm {
//!             title: "Broken projector".into(),
//!             description: "The projector in room 204 has been broken for a week.".into(),
//!             category: Some(Category::Infrastructure),
//!             is_anonymous: false,
//!         })
//!         .await
//!         .unwrap();
//!
//!     assert!(portal.feedback().get_by_id(&item.id).is_some());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `campus_voice::core` - Data model, validation and queries
//! - `campus_voice::store` - Storage abstraction, SQLite and in-memory backends

pub mod config;
pub mod error;
pub mod events;
pub mod feedback;
pub mod portal;
pub mod routes;
pub mod session;

// Re-export component crates
pub use campus_voice_core as core;
pub use campus_voice_store as store;

pub use config::{AuthConfig, PortalConfig, StorageKeys};
pub use error::{FeedbackError, PortalError, Result, SessionError};
pub use events::{FeedbackEvent, SessionEvent};
pub use feedback::FeedbackStore;
pub use portal::Portal;
pub use routes::{guard, Access, DenyReason, Route};
pub use session::SessionStore;

// Re-export commonly used core types
pub use campus_voice_core::{
    Category, Comment, CommentDraft, FeedbackDraft, FeedbackFilter, FeedbackForm, FeedbackId,
    FeedbackItem, FeedbackStats, Identity, Role, Status, UserId,
};
