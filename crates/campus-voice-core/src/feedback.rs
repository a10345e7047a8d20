//! Feedback items and their comment threads.
//!
//! A [`FeedbackItem`] is created from a [`FeedbackDraft`] with status
//! `pending`, then mutated in place by status changes and comment appends.
//! Items are never deleted; comments are never edited.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identity::{Identity, Role};
use crate::types::{CommentId, FeedbackId, UserId};

/// Lifecycle state of a feedback item.
///
/// All states are mutually reachable; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Resolved];

    /// The wire name (`pending`, `in_progress`, `resolved`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_owned()))
    }
}

/// The fixed set of feedback categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Academics,
    Infrastructure,
    Services,
    Sports,
    Events,
    Hostel,
    Transportation,
    Safety,
    Other,
}

impl Category {
    /// All categories in the order the submission form lists them.
    pub const ALL: [Category; 9] = [
        Category::Academics,
        Category::Infrastructure,
        Category::Services,
        Category::Sports,
        Category::Events,
        Category::Hostel,
        Category::Transportation,
        Category::Safety,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Academics => "Academics",
            Category::Infrastructure => "Infrastructure",
            Category::Services => "Services",
            Category::Sports => "Sports",
            Category::Events => "Events",
            Category::Hostel => "Hostel",
            Category::Transportation => "Transportation",
            Category::Safety => "Safety",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownCategory(s.to_owned()))
    }
}

/// A reply attached to exactly one feedback item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub user_id: UserId,
    pub user_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub text: String,
    pub user_id: UserId,
    pub user_name: String,
    pub role: Role,
}

impl CommentDraft {
    /// A comment authored by `identity`.
    pub fn by(identity: &Identity, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id: identity.id.clone(),
            user_name: identity.name.clone(),
            role: identity.role,
        }
    }

    /// Stamp the draft with an id and creation time.
    pub fn into_comment(self, id: CommentId, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            text: self.text,
            user_id: self.user_id,
            user_name: self.user_name,
            role: self.role,
            created_at,
        }
    }
}

/// A user-submitted report tracked through a status lifecycle.
///
/// `user_name` is `None` exactly when `is_anonymous` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: FeedbackId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: Status,
    pub is_anonymous: bool,
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl FeedbackItem {
    /// Number of comments in the thread.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Name shown to other viewers.
    pub fn author_label(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Anonymous")
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Move `updated_at` forward to `now`.
    ///
    /// If `now` does not lie after the current value, the timestamp advances
    /// by one millisecond instead, so every refresh is observable.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }

    /// Set the status and refresh `updated_at`. Returns the previous status.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) -> Status {
        let previous = self.status;
        self.status = status;
        self.touch(now);
        previous
    }

    /// Append a comment and refresh `updated_at`.
    pub fn push_comment(&mut self, comment: Comment) {
        let at = comment.created_at;
        self.comments.push(comment);
        self.touch(at);
    }
}

/// Input for creating a feedback item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub is_anonymous: bool,
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub status: Status,
    pub attachments: Vec<String>,
}

impl FeedbackDraft {
    /// A pending draft authored by `author`, with the display name withheld
    /// when `is_anonymous` is set.
    pub fn from_author(
        author: &Identity,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        is_anonymous: bool,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            is_anonymous,
            user_id: author.id.clone(),
            user_name: (!is_anonymous).then(|| author.name.clone()),
            status: Status::Pending,
            attachments: Vec::new(),
        }
    }

    /// Attach file references to the draft.
    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Materialize the draft with an id and timestamp.
    ///
    /// `created_at` and `updated_at` are both set to `now`; the comment
    /// thread starts empty. An anonymous draft never carries its author's
    /// name into the item, whatever `user_name` holds.
    pub fn into_item(self, id: FeedbackId, now: DateTime<Utc>) -> FeedbackItem {
        let user_name = if self.is_anonymous { None } else { self.user_name };

        FeedbackItem {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            status: self.status,
            is_anonymous: self.is_anonymous,
            user_id: self.user_id,
            user_name,
            created_at: now,
            updated_at: now,
            attachments: self.attachments,
            comments: Vec::new(),
        }
    }
}
