//! # Campus Voice Core
//!
//! Pure data model for the Campus Voice feedback portal: identities, feedback
//! items, comment threads, and the queries dashboards run over them.
//!
//! This crate contains no I/O and no storage. Persistence lives in
//! `campus-voice-store`, the stateful stores in `campus-voice`.
//!
//! ## Key Types
//!
//! - [`Identity`] - An authenticated user with a [`Role`]
//! - [`FeedbackItem`] - A submitted report tracked through a [`Status`] lifecycle
//! - [`Comment`] - An immutable reply appended to one feedback item
//! - [`FeedbackDraft`] / [`CommentDraft`] - Inputs for creating items and comments
//! - [`FeedbackForm`] - Raw submission form input, checked by [`FeedbackForm::validate`]
//! - [`FeedbackFilter`] / [`FeedbackStats`] - Dashboard search and statistics
//!
//! ## Wire Format
//!
//! Items serialize to camelCase JSON with RFC 3339 timestamps, the layout
//! persisted under the feedback collection key.

pub mod clock;
pub mod error;
pub mod feedback;
pub mod identity;
pub mod query;
pub mod seed;
pub mod types;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use error::CoreError;
pub use feedback::{Category, Comment, CommentDraft, FeedbackDraft, FeedbackItem, Status};
pub use identity::{display_name_from_email, Identity, Role};
pub use query::{most_recent, open_items, recently_updated, visible_to, FeedbackFilter, FeedbackStats};
pub use seed::seed_items;
pub use types::{CommentId, FeedbackId, UserId};
pub use validation::{validate_comment_text, FeedbackForm, FieldError, ValidationErrors};
