//! The session store: owns the single active identity.
//!
//! Authentication is a mock. Passwords are never checked; sign-in and
//! sign-up wait for the configured delay to mimic a remote call, then
//! persist the resulting identity under the session key so it survives a
//! restart.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use campus_voice_core::{display_name_from_email, Identity, UserId};
use campus_voice_store::KvStore;
use tokio::sync::broadcast;

use crate::config::{AuthConfig, PortalConfig};
use crate::error::SessionError;
use crate::events::{publish, SessionEvent};

/// Holds the active identity, or none.
pub struct SessionStore<S: KvStore> {
    kv: Arc<S>,
    key: String,
    auth: AuthConfig,
    current: RwLock<Option<Identity>>,
    /// Number of sign-in/sign-up calls currently waiting.
    in_flight: AtomicUsize,
    events: broadcast::Sender<SessionEvent>,
}

/// Marks a sign-in or sign-up as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: KvStore> SessionStore<S> {
    /// Restore the persisted identity, if any.
    ///
    /// Never fails: an unreadable or corrupt entry is logged and the session
    /// starts signed out.
    pub async fn initialize(kv: Arc<S>, config: &PortalConfig) -> Self {
        let key = config.keys.session.clone();

        let current = match kv.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    tracing::info!(user_id = %identity.id, role = %identity.role, "restored session");
                    Some(identity)
                }
                Err(e) => {
                    tracing::warn!(%key, error = %e, "ignoring corrupt persisted session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "could not read persisted session");
                None
            }
        };

        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            kv,
            key,
            auth: config.auth.clone(),
            current: RwLock::new(current),
            in_flight: AtomicUsize::new(0),
            events,
        }
    }

    /// The active identity.
    pub fn current(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Identity::is_admin)
    }

    /// Whether a sign-in or sign-up is still waiting on the mock backend.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Receive a [`SessionEvent`] for every sign-in, sign-up and sign-out.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Sign in with `email`. The password is accepted unconditionally.
    ///
    /// The reserved admin email yields the admin identity. Any other email
    /// yields a student whose id is derived from the email and whose name is
    /// derived from its local part.
    pub async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, SessionError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        tokio::time::sleep(self.auth.delay).await;

        let identity = if self.auth.is_admin_email(email) {
            self.auth.admin_identity()
        } else {
            let email = email.trim();
            let name = display_name_from_email(email)
                .unwrap_or_else(|| self.auth.fallback_student_name.clone());
            Identity::student(UserId::from_email(email), name, email)
        };

        let raw = serde_json::to_string(&identity)?;
        self.kv
            .set(&self.key, &raw)
            .await
            .map_err(SessionError::SignInFailed)?;

        tracing::info!(user_id = %identity.id, role = %identity.role, "signed in");
        self.activate(identity.clone());
        Ok(identity)
    }

    /// Register a new student. Always gets a fresh id.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Identity, SessionError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        tokio::time::sleep(self.auth.delay).await;

        let identity = Identity::student(UserId::generate(), name.trim(), email.trim());

        let raw = serde_json::to_string(&identity)?;
        self.kv
            .set(&self.key, &raw)
            .await
            .map_err(SessionError::SignUpFailed)?;

        tracing::info!(user_id = %identity.id, "registered");
        self.activate(identity.clone());
        Ok(identity)
    }

    /// Clear the active and persisted identity.
    ///
    /// Always succeeds; a failure to delete the persisted entry is logged.
    pub async fn sign_out(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Err(e) = self.kv.remove(&self.key).await {
            tracing::warn!(key = %self.key, error = %e, "could not remove persisted session");
        }

        if let Some(identity) = previous {
            tracing::info!(user_id = %identity.id, "signed out");
        }
        publish(&self.events, SessionEvent::SignedOut);
    }

    fn activate(&self, identity: Identity) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        publish(&self.events, SessionEvent::SignedIn(identity));
    }
}
