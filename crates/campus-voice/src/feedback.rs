//! The feedback store: owns the feedback collection and its comment threads.
//!
//! The whole collection is persisted as one JSON array under the feedback
//! key. Every mutation clones the current snapshot, applies the change,
//! writes the full array, and only then swaps the new snapshot in. Mutations
//! are serialized by an async mutex, so no two read-modify-write cycles
//! interleave; readers never wait on storage.

use std::sync::{Arc, PoisonError, RwLock};

use campus_voice_core::{
    seed_items, visible_to, Clock, Comment, CommentDraft, CommentId, FeedbackDraft, FeedbackFilter,
    FeedbackId, FeedbackItem, FeedbackStats, Identity, Status,
};
use campus_voice_store::KvStore;
use tokio::sync::{broadcast, Mutex};

use crate::config::PortalConfig;
use crate::error::FeedbackError;
use crate::events::{publish, FeedbackEvent};

/// Result type for feedback store operations.
pub type Result<T> = std::result::Result<T, FeedbackError>;

/// The feedback collection and its persistence.
pub struct FeedbackStore<S: KvStore> {
    kv: Arc<S>,
    key: String,
    seed_on_empty: bool,
    clock: Arc<dyn Clock>,
    /// Current snapshot, replaced wholesale after each persisted mutation.
    items: RwLock<Arc<Vec<FeedbackItem>>>,
    /// Serializes read-modify-persist cycles.
    write_lock: Mutex<()>,
    events: broadcast::Sender<FeedbackEvent>,
}

impl<S: KvStore> FeedbackStore<S> {
    /// Load the persisted collection, seeding it on first start.
    ///
    /// Seeding happens only when the key is absent. A persisted empty array
    /// is respected and never re-seeded.
    pub async fn initialize(kv: Arc<S>, config: &PortalConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let store = Self {
            kv,
            key: config.keys.feedback.clone(),
            seed_on_empty: config.seed_on_empty,
            clock,
            items: RwLock::new(Arc::new(Vec::new())),
            write_lock: Mutex::new(()),
            events,
        };

        let items = store.load().await?;
        tracing::debug!(key = %store.key, count = items.len(), "loaded feedback");
        store.replace(items);
        Ok(store)
    }

    /// Re-read the collection from storage, discarding the snapshot.
    ///
    /// Picks up writes made by another handle on the same medium. Follows
    /// the same seeding rule as [`FeedbackStore::initialize`].
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let items = self.load().await?;
        let count = items.len();
        self.replace(items);
        publish(&self.events, FeedbackEvent::Reloaded { count });
        Ok(())
    }

    /// All items in submission order.
    pub fn list(&self) -> Arc<Vec<FeedbackItem>> {
        Arc::clone(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// The item with `id`, if any.
    pub fn get_by_id(&self, id: &FeedbackId) -> Option<FeedbackItem> {
        self.list().iter().find(|item| &item.id == id).cloned()
    }

    /// Items matching `filter`, in submission order.
    pub fn filter(&self, filter: &FeedbackFilter) -> Vec<FeedbackItem> {
        filter.apply(&self.list()).into_iter().cloned().collect()
    }

    /// Items `viewer` may list.
    pub fn visible_to(&self, viewer: &Identity) -> Vec<FeedbackItem> {
        visible_to(&self.list(), viewer).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> FeedbackStats {
        FeedbackStats::compute(self.list().iter())
    }

    /// Receive a [`FeedbackEvent`] after every persisted change.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedbackEvent> {
        self.events.subscribe()
    }

    /// Append a new item built from `draft`.
    ///
    /// Performs no validation; see `FeedbackForm` for the form-level checks.
    pub async fn add(&self, draft: FeedbackDraft) -> Result<FeedbackItem> {
        let now = self.clock.now();

        let item = {
            let _guard = self.write_lock.lock().await;
            let mut next = self.list().as_ref().clone();

            let mut id = FeedbackId::generate();
            while next.iter().any(|item| item.id == id) {
                id = FeedbackId::generate();
            }
            let item = draft.into_item(id, now);
            next.push(item.clone());

            self.persist(&next).await?;
            self.replace(next);
            item
        };

        tracing::debug!(id = %item.id, category = %item.category, "feedback created");
        publish(&self.events, FeedbackEvent::Created { id: item.id.clone() });
        Ok(item)
    }

    /// Set the status of item `id` and refresh its `updated_at`.
    ///
    /// Returns `None` without touching storage when no item has that id.
    /// Any status may follow any other.
    pub async fn update_status(&self, id: &FeedbackId, status: Status) -> Result<Option<FeedbackItem>> {
        let now = self.clock.now();

        let updated = self
            .mutate(|items| {
                let item = items.iter_mut().find(|item| &item.id == id)?;
                let from = item.set_status(status, now);
                Some((from, item.clone()))
            })
            .await?;

        let Some((from, item)) = updated else {
            tracing::debug!(%id, "status update for unknown feedback ignored");
            return Ok(None);
        };

        tracing::debug!(%id, %from, to = %status, "feedback status changed");
        publish(
            &self.events,
            FeedbackEvent::StatusChanged {
                id: item.id.clone(),
                from,
                to: status,
            },
        );
        Ok(Some(item))
    }

    /// Append a comment to item `feedback_id` and refresh its `updated_at`.
    ///
    /// Returns `None` without touching storage when no item has that id.
    pub async fn add_comment(&self, feedback_id: &FeedbackId, draft: CommentDraft) -> Result<Option<Comment>> {
        let now = self.clock.now();

        let added = self
            .mutate(|items| {
                let item = items.iter_mut().find(|item| &item.id == feedback_id)?;
                let mut id = CommentId::generate();
                while item.comments.iter().any(|c| c.id == id) {
                    id = CommentId::generate();
                }
                let comment = draft.into_comment(id, now);
                item.push_comment(comment.clone());
                Some(comment)
            })
            .await?;

        let Some(comment) = added else {
            tracing::debug!(%feedback_id, "comment for unknown feedback ignored");
            return Ok(None);
        };

        tracing::debug!(%feedback_id, comment_id = %comment.id, role = %comment.role, "comment added");
        publish(
            &self.events,
            FeedbackEvent::CommentAdded {
                feedback_id: feedback_id.clone(),
                comment_id: comment.id.clone(),
            },
        );
        Ok(Some(comment))
    }

    /// Run one read-modify-persist-replace cycle.
    ///
    /// `f` edits a copy of the snapshot. Returning `None` aborts the cycle
    /// with nothing written.
    async fn mutate<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Vec<FeedbackItem>) -> Option<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut next = self.list().as_ref().clone();
        let Some(out) = f(&mut next) else {
            return Ok(None);
        };

        self.persist(&next).await?;
        self.replace(next);
        Ok(Some(out))
    }

    async fn load(&self) -> Result<Vec<FeedbackItem>> {
        match self.kv.get(&self.key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| FeedbackError::Corrupt {
                key: self.key.clone(),
                source,
            }),
            None if self.seed_on_empty => {
                let seed = seed_items(self.clock.now());
                self.persist(&seed).await?;
                tracing::info!(key = %self.key, count = seed.len(), "seeded example feedback");
                Ok(seed)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, items: &[FeedbackItem]) -> Result<()> {
        let raw = serde_json::to_string(items).map_err(FeedbackError::Encoding)?;
        self.kv.set(&self.key, &raw).await?;
        tracing::trace!(key = %self.key, count = items.len(), bytes = raw.len(), "persisted feedback");
        Ok(())
    }

    fn replace(&self, items: Vec<FeedbackItem>) {
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use campus_voice_core::{Category, Role, UserId};
    use campus_voice_store::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Clock that advances one second per reading.
    struct StepClock(StdMutex<DateTime<Utc>>);

    impl StepClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(StdMutex::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            )))
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.0.lock().unwrap();
            *now += Duration::seconds(1);
            *now
        }
    }

    fn student() -> Identity {
        Identity::student(UserId::new("2"), "Student User", "student@campus.com")
    }

    fn draft(anonymous: bool) -> FeedbackDraft {
        FeedbackDraft::from_author(
            &student(),
            "Broken heater",
            "The heater in the east reading room has been off all week.",
            Category::Infrastructure,
            anonymous,
        )
    }

    async fn open(kv: Arc<MemoryStore>) -> FeedbackStore<MemoryStore> {
        FeedbackStore::initialize(kv, &PortalConfig::for_tests(), StepClock::new())
            .await
            .unwrap()
    }

    async fn persisted(kv: &MemoryStore) -> Vec<FeedbackItem> {
        let raw = kv.get("campusVoiceFeedbacks").await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_seeds_fresh_storage() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;

        let ids: Vec<_> = store.list().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(persisted(&kv).await.len(), 3);
    }

    #[tokio::test]
    async fn test_initialize_respects_empty_collection() {
        let kv = Arc::new(MemoryStore::with_entries([("campusVoiceFeedbacks", "[]")]));
        let store = open(kv).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_no_seed_when_disabled() {
        let kv = Arc::new(MemoryStore::new());
        let config = PortalConfig::for_tests().with_seed_on_empty(false);
        let store = FeedbackStore::initialize(Arc::clone(&kv), &config, StepClock::new())
            .await
            .unwrap();
        assert!(store.is_empty());
        assert!(!kv.contains("campusVoiceFeedbacks").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_withholds_name_of_hand_built_anonymous_draft() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;

        let mut hand_built = draft(false);
        hand_built.is_anonymous = true;
        let item = store.add(hand_built).await.unwrap();

        assert!(item.user_name.is_none());
        let stored = persisted(&kv).await;
        let last = stored.last().unwrap();
        assert!(last.is_anonymous);
        assert!(last.user_name.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let kv = Arc::new(MemoryStore::with_entries([("campusVoiceFeedbacks", "{oops")]));
        let result = FeedbackStore::initialize(kv, &PortalConfig::for_tests(), StepClock::new()).await;
        assert!(matches!(result, Err(FeedbackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_add_appends_and_persists() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;

        let item = store.add(draft(false)).await.unwrap();
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.status, Status::Pending);
        assert!(item.comments.is_empty());

        assert_eq!(store.get_by_id(&item.id), Some(item.clone()));
        assert_eq!(store.list().last(), Some(&item));
        assert_eq!(persisted(&kv).await.last(), Some(&item));
    }

    #[tokio::test]
    async fn test_add_anonymous() {
        let store = open(Arc::new(MemoryStore::new())).await;
        let item = store.add(draft(true)).await.unwrap();
        assert!(item.is_anonymous);
        assert!(item.user_name.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let store = open(Arc::new(MemoryStore::new())).await;
        assert!(store.get_by_id(&FeedbackId::new("nope")).is_none());
    }

    #[tokio::test]
    async fn test_update_status() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;
        let id = FeedbackId::new("3");
        let before = store.get_by_id(&id).unwrap();

        let updated = store.update_status(&id, Status::Resolved).await.unwrap().unwrap();
        assert_eq!(updated.status, Status::Resolved);
        assert!(updated.updated_at > before.updated_at);
        assert_eq!(store.get_by_id(&id), Some(updated.clone()));

        let on_disk = persisted(&kv).await;
        assert_eq!(on_disk[2], updated);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_writes_nothing() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;
        kv.set_read_only(true);

        let result = store
            .update_status(&FeedbackId::new("missing"), Status::Resolved)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_add_comment_is_append_only() {
        let store = open(Arc::new(MemoryStore::new())).await;
        let id = FeedbackId::new("2");
        let before = store.get_by_id(&id).unwrap();

        let admin = Identity::admin(UserId::new("1"), "Admin User", "admin@campus.com");
        let comment = store
            .add_comment(&id, CommentDraft::by(&admin, "Menu updated again."))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(comment.role, Role::Admin);

        let after = store.get_by_id(&id).unwrap();
        assert_eq!(after.comments.len(), before.comments.len() + 1);
        assert_eq!(&after.comments[..before.comments.len()], &before.comments[..]);
        assert_eq!(after.comments.last(), Some(&comment));
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_add_comment_unknown_id() {
        let store = open(Arc::new(MemoryStore::new())).await;
        let result = store
            .add_comment(&FeedbackId::new("missing"), CommentDraft::by(&student(), "hi"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_snapshot_untouched() {
        let kv = Arc::new(MemoryStore::new());
        let store = open(Arc::clone(&kv)).await;
        kv.set_read_only(true);

        assert!(matches!(store.add(draft(false)).await, Err(FeedbackError::Store(_))));
        assert!(store
            .update_status(&FeedbackId::new("1"), Status::Resolved)
            .await
            .is_err());
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get_by_id(&FeedbackId::new("1")).unwrap().status,
            Status::InProgress
        );
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_writes() {
        let kv = Arc::new(MemoryStore::new());
        let a = open(Arc::clone(&kv)).await;
        let b = open(Arc::clone(&kv)).await;

        let item = a.add(draft(false)).await.unwrap();
        assert!(b.get_by_id(&item.id).is_none());

        b.reload().await.unwrap();
        assert!(b.get_by_id(&item.id).is_some());
        assert_eq!(b.len(), 4);
    }

    #[tokio::test]
    async fn test_events_follow_mutations() {
        let store = open(Arc::new(MemoryStore::new())).await;
        let mut rx = store.subscribe();

        let item = store.add(draft(false)).await.unwrap();
        store.update_status(&item.id, Status::InProgress).await.unwrap();
        let comment = store
            .add_comment(&item.id, CommentDraft::by(&student(), "Any news?"))
            .await
            .unwrap()
            .unwrap();
        store.update_status(&FeedbackId::new("missing"), Status::Resolved).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), FeedbackEvent::Created { id: item.id.clone() });
        assert_eq!(
            rx.recv().await.unwrap(),
            FeedbackEvent::StatusChanged {
                id: item.id.clone(),
                from: Status::Pending,
                to: Status::InProgress,
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            FeedbackEvent::CommentAdded {
                feedback_id: item.id.clone(),
                comment_id: comment.id,
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_queries() {
        let store = open(Arc::new(MemoryStore::new())).await;
        store.add(draft(false)).await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);

        let mine = store.visible_to(&student());
        let ids: Vec<_> = mine.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(ids, vec!["Poor WiFi in Dorm Building A", "Broken heater"]);

        let heater = store.filter(&FeedbackFilter::new().search("heater"));
        assert_eq!(heater.len(), 1);
    }
}
