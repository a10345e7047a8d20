//! Configuration for the portal stores.

use std::time::Duration;

use campus_voice_core::{Identity, UserId};

/// Storage key of the persisted session identity.
pub const SESSION_KEY: &str = "campusVoiceUser";

/// Storage key of the persisted feedback collection.
pub const FEEDBACK_KEY: &str = "campusVoiceFeedbacks";

/// Reserved address that signs in as the administrator.
pub const ADMIN_EMAIL: &str = "admin@campus.com";

/// Artificial latency of sign-in and sign-up.
pub const AUTH_DELAY: Duration = Duration::from_millis(1000);

/// Settings of the mock authentication backend.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long sign-in and sign-up wait before completing.
    pub delay: Duration,
    /// Email that yields the admin identity.
    pub admin_email: String,
    pub admin_name: String,
    pub admin_id: UserId,
    /// Name given to students whose email yields no usable name.
    pub fallback_student_name: String,
}

impl AuthConfig {
    /// The identity handed out for the reserved admin email.
    pub fn admin_identity(&self) -> Identity {
        Identity::admin(
            self.admin_id.clone(),
            self.admin_name.clone(),
            self.admin_email.clone(),
        )
    }

    /// Whether `email` is the reserved admin address.
    pub fn is_admin_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.admin_email)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            delay: AUTH_DELAY,
            admin_email: ADMIN_EMAIL.to_owned(),
            admin_name: "Admin User".to_owned(),
            admin_id: UserId::new("1"),
            fallback_student_name: "Student User".to_owned(),
        }
    }
}

/// Where each store keeps its document.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    pub session: String,
    pub feedback: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: SESSION_KEY.to_owned(),
            feedback: FEEDBACK_KEY.to_owned(),
        }
    }
}

/// Configuration for the portal.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub auth: AuthConfig,
    pub keys: StorageKeys,
    /// Write the example items when no collection is persisted yet.
    pub seed_on_empty: bool,
    /// Capacity of each change-event channel.
    pub event_capacity: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            keys: StorageKeys::default(),
            seed_on_empty: true,
            event_capacity: 64,
        }
    }
}

impl PortalConfig {
    /// Default settings without the artificial auth delay.
    pub fn for_tests() -> Self {
        Self::default().with_auth_delay(Duration::ZERO)
    }

    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth.delay = delay;
        self
    }

    pub fn with_admin_email(mut self, email: impl Into<String>) -> Self {
        self.auth.admin_email = email.into();
        self
    }

    pub fn with_keys(mut self, session: impl Into<String>, feedback: impl Into<String>) -> Self {
        self.keys = StorageKeys {
            session: session.into(),
            feedback: feedback.into(),
        };
        self
    }

    pub fn with_seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }
}
