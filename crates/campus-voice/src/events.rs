//! Change notifications published by the stores.
//!
//! Each store owns a broadcast channel and publishes after every successful
//! persisted mutation. Subscribers that fall behind receive
//! `RecvError::Lagged` and should re-read the snapshot.

use campus_voice_core::{CommentId, FeedbackId, Identity, Status};
use tokio::sync::broadcast;

/// A change to the feedback collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// A new item was appended.
    Created { id: FeedbackId },
    /// An item's status was set.
    StatusChanged {
        id: FeedbackId,
        from: Status,
        to: Status,
    },
    /// A comment was appended to an item's thread.
    CommentAdded {
        feedback_id: FeedbackId,
        comment_id: CommentId,
    },
    /// The snapshot was replaced from storage (initial load or reload).
    Reloaded { count: usize },
}

impl FeedbackEvent {
    /// The item this event concerns, if any.
    pub fn feedback_id(&self) -> Option<&FeedbackId> {
        match self {
            FeedbackEvent::Created { id } | FeedbackEvent::StatusChanged { id, .. } => Some(id),
            FeedbackEvent::CommentAdded { feedback_id, .. } => Some(feedback_id),
            FeedbackEvent::Reloaded { .. } => None,
        }
    }
}

/// A change to the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Identity),
    SignedOut,
}

/// Send `event`, ignoring the absence of subscribers.
pub(crate) fn publish<T: Clone>(sender: &broadcast::Sender<T>, event: T) {
    // Err only means nobody is listening.
    let _ = sender.send(event);
}
