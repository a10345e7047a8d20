//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use campus_voice::{Portal, PortalConfig};
use campus_voice_core::{Category, Clock, FeedbackDraft, Identity, UserId};
use campus_voice_store::MemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// A clock fixed at 2024-09-02 08:00 UTC.
    pub fn new() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The seeded student with id `2`.
pub fn student() -> Identity {
    Identity::student(UserId::new("2"), "Student User", "student@campus.com")
}

/// The admin identity handed out for the reserved email.
pub fn admin() -> Identity {
    Identity::admin(UserId::new("1"), "Admin User", "admin@campus.com")
}

/// A portal over in-memory storage with a manual clock and no auth delay.
pub struct TestPortal {
    pub portal: Portal<MemoryStore>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl TestPortal {
    /// Fresh storage; the portal seeds itself.
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    /// Open a portal over existing storage, as after a restart.
    pub async fn with_store(store: Arc<MemoryStore>) -> Self {
        let clock = Arc::new(ManualClock::new());
        let portal = Portal::open_with_clock(
            Arc::clone(&store),
            PortalConfig::for_tests(),
            Arc::clone(&clock) as Arc<dyn Clock>,
        )
        .await
        .unwrap_or_else(|e| panic!("test portal failed to open: {e}"));

        Self {
            portal,
            store,
            clock,
        }
    }

    pub async fn sign_in_admin(&self) -> Identity {
        self.sign_in("admin@campus.com").await
    }

    pub async fn sign_in(&self, email: &str) -> Identity {
        self.portal
            .session()
            .sign_in(email, "password")
            .await
            .unwrap_or_else(|e| panic!("sign-in failed: {e}"))
    }

    /// A pending draft by `author`.
    pub fn draft(&self, author: &Identity, title: &str, anonymous: bool) -> FeedbackDraft {
        FeedbackDraft::from_author(
            author,
            title,
            format!("{title}: details reported through the test portal."),
            Category::Other,
            anonymous,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now() - start, Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_fixture_opens_seeded() {
        let fixture = TestPortal::new().await;
        assert_eq!(fixture.portal.feedback().len(), 3);
        assert!(!fixture.portal.session().is_authenticated());

        let admin = fixture.sign_in_admin().await;
        assert_eq!(admin, super::admin());
    }
}
