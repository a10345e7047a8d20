//! Strong identifier types for Campus Voice.
//!
//! All identifiers are string newtypes so a feedback id can never be passed
//! where a comment or user id is expected. Seeded records use short numeric
//! strings (`"1"`, `"101"`); everything created at runtime gets a UUID v4.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, collision-resistant identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a feedback item.
    FeedbackId
);

string_id!(
    /// Identifier of a comment within a feedback thread.
    CommentId
);

string_id!(
    /// Identifier of an identity.
    UserId
);

/// Namespace for email-derived user ids.
const USER_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_8d4b_4f0a_9e57_2b6c_d1e8_a930);

impl UserId {
    /// Derive a stable id from an email address.
    ///
    /// The same address (ignoring case and surrounding whitespace) always
    /// maps to the same id; distinct addresses map to distinct ids.
    pub fn from_email(email: &str) -> Self {
        let normalized = email.trim().to_lowercase();
        Self(Uuid::new_v5(&USER_NAMESPACE, normalized.as_bytes()).to_string())
    }
}
