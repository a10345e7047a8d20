//! Error types for the Campus Voice core.

use thiserror::Error;

/// Errors raised when parsing core values from their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),
}
