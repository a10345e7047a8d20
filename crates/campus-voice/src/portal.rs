//! The Portal: both stores, constructed once and handed to consumers.
//!
//! The Portal owns the shared storage handle and enforces the role rules
//! the pages rely on: submitting and commenting need a signed-in identity,
//! triage needs an admin.

use std::sync::Arc;

use campus_voice_core::{
    validate_comment_text, Clock, Comment, CommentDraft, FeedbackForm, FeedbackId, FeedbackItem,
    Identity, Role, Status, SystemClock,
};
use campus_voice_store::KvStore;

use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::feedback::FeedbackStore;
use crate::routes::{self, Access, Route};
use crate::session::SessionStore;

/// Session and feedback stores over one storage medium.
pub struct Portal<S: KvStore> {
    session: SessionStore<S>,
    feedback: FeedbackStore<S>,
    config: PortalConfig,
}

impl<S: KvStore> Portal<S> {
    /// Initialize both stores against `store` using wall-clock time.
    pub async fn open(store: S, config: PortalConfig) -> Result<Self> {
        Self::open_with_clock(Arc::new(store), config, Arc::new(SystemClock)).await
    }

    /// Initialize both stores with an explicit clock.
    pub async fn open_with_clock(
        store: Arc<S>,
        config: PortalConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let session = SessionStore::initialize(Arc::clone(&store), &config).await;
        let feedback = FeedbackStore::initialize(store, &config, clock).await?;
        tracing::info!(
            signed_in = session.is_authenticated(),
            items = feedback.len(),
            "portal ready"
        );
        Ok(Self {
            session,
            feedback,
            config,
        })
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn feedback(&self) -> &FeedbackStore<S> {
        &self.feedback
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Check whether the current identity may open `route`.
    pub fn navigate(&self, route: &Route) -> Access {
        routes::resolve(route, self.session.current().as_ref(), &self.feedback)
    }

    /// Validate `form` and submit it as the signed-in identity.
    pub async fn submit(&self, form: &FeedbackForm) -> Result<FeedbackItem> {
        let author = self.require_identity()?;
        let draft = form.validate(&author)?;
        Ok(self.feedback.add(draft).await?)
    }

    /// Comment on item `id` as the signed-in identity.
    pub async fn comment(&self, id: &FeedbackId, text: &str) -> Result<Comment> {
        let author = self.require_identity()?;
        validate_comment_text(text)?;

        self.feedback
            .add_comment(id, CommentDraft::by(&author, text))
            .await?
            .ok_or_else(|| PortalError::FeedbackNotFound(id.clone()))
    }

    /// Change the status of item `id`. Admins only.
    pub async fn set_status(&self, id: &FeedbackId, status: Status) -> Result<FeedbackItem> {
        let actor = self.require_identity()?;
        if !actor.is_admin() {
            return Err(PortalError::Forbidden {
                required: Role::Admin,
                actual: actor.role,
            });
        }

        self.feedback
            .update_status(id, status)
            .await?
            .ok_or_else(|| PortalError::FeedbackNotFound(id.clone()))
    }

    /// Items the signed-in identity may list.
    pub fn my_feedback(&self) -> Result<Vec<FeedbackItem>> {
        let viewer = self.require_identity()?;
        Ok(self.feedback.visible_to(&viewer))
    }

    fn require_identity(&self) -> Result<Identity> {
        self.session.current().ok_or(PortalError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_voice_core::Category;
    use campus_voice_store::MemoryStore;

    use crate::routes::DenyReason;

    fn form() -> FeedbackForm {
        FeedbackForm {
            title: "Late buses".into(),
            description: "The 8am shuttle has been twenty minutes late all month.".into(),
            category: Some(Category::Transportation),
            is_anonymous: false,
        }
    }

    async fn portal() -> Portal<MemoryStore> {
        Portal::open(MemoryStore::new(), PortalConfig::for_tests())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_requires_sign_in() {
        let portal = portal().await;
        assert!(matches!(
            portal.submit(&form()).await,
            Err(PortalError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_submit_validates() {
        let portal = portal().await;
        portal.session().sign_in("kim@campus.com", "pw").await.unwrap();

        let bad = FeedbackForm {
            title: "Bus".into(),
            ..form()
        };
        assert!(matches!(
            portal.submit(&bad).await,
            Err(PortalError::Validation(_))
        ));
        assert_eq!(portal.feedback().len(), 3);

        let item = portal.submit(&form()).await.unwrap();
        assert_eq!(item.user_name.as_deref(), Some("Kim"));
        assert_eq!(portal.my_feedback().unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn test_status_change_is_admin_only() {
        let portal = portal().await;
        let id = FeedbackId::new("3");

        portal.session().sign_in("kim@campus.com", "pw").await.unwrap();
        assert!(matches!(
            portal.set_status(&id, Status::Resolved).await,
            Err(PortalError::Forbidden { .. })
        ));

        portal.session().sign_in("admin@campus.com", "pw").await.unwrap();
        let item = portal.set_status(&id, Status::Resolved).await.unwrap();
        assert_eq!(item.status, Status::Resolved);

        assert!(matches!(
            portal.set_status(&FeedbackId::new("404"), Status::Pending).await,
            Err(PortalError::FeedbackNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comment() {
        let portal = portal().await;
        portal.session().sign_in("kim@campus.com", "pw").await.unwrap();

        assert!(matches!(
            portal.comment(&FeedbackId::new("1"), "   ").await,
            Err(PortalError::Validation(_))
        ));

        let comment = portal.comment(&FeedbackId::new("1"), "Still slow").await.unwrap();
        assert_eq!(comment.role, Role::Student);
        assert_eq!(comment.user_name, "Kim");
    }

    #[tokio::test]
    async fn test_navigate() {
        let portal = portal().await;
        assert!(matches!(
            portal.navigate(&Route::Dashboard),
            Access::Redirect {
                reason: DenyReason::NotAuthenticated,
                ..
            }
        ));

        portal.session().sign_in("kim@campus.com", "pw").await.unwrap();
        assert_eq!(
            portal.navigate(&Route::FeedbackDetail(FeedbackId::new("2"))),
            Access::Allow
        );
        assert_eq!(
            portal.navigate(&Route::FeedbackDetail(FeedbackId::new("99"))),
            Access::Redirect {
                to: Route::Dashboard,
                reason: DenyReason::FeedbackNotFound,
            }
        );
    }
}
