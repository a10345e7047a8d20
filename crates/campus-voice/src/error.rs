//! Error types for the portal.

use campus_voice_core::{FeedbackId, Role, ValidationErrors};
use campus_voice_store::StoreError;
use thiserror::Error;

/// Errors from the session store.
///
/// The mock backend never rejects credentials; these surface only when the
/// identity cannot be persisted.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid login credentials")]
    SignInFailed(#[source] StoreError),

    #[error("registration failed")]
    SignUpFailed(#[source] StoreError),

    #[error("session could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors from the feedback store.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The persisted collection is not valid JSON of the expected shape.
    #[error("persisted feedback under {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be encoded for writing.
    #[error("feedback could not be encoded: {0}")]
    Encoding(#[source] serde_json::Error),
}

/// Errors surfaced by [`crate::Portal`] operations.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The operation needs a signed-in identity.
    #[error("not signed in")]
    NotAuthenticated,

    /// The signed-in identity lacks the required role.
    #[error("requires role {required}, signed in as {actual}")]
    Forbidden { required: Role, actual: Role },

    /// The referenced feedback item does not exist.
    #[error("feedback not found: {0}")]
    FeedbackNotFound(FeedbackId),
}

/// Result type for portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
