//! Navigable routes and the access rules page collaborators enforce.

use std::fmt;

use campus_voice_core::{FeedbackId, Identity};
use campus_voice_store::KvStore;

use crate::feedback::FeedbackStore;

/// A page of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Dashboard,
    Login,
    Register,
    SubmitFeedback,
    FeedbackDetail(FeedbackId),
    AdminDashboard,
    NotFound,
}

impl Route {
    /// Parse a URL path. Unknown paths map to [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/dashboard" => Route::Dashboard,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/submit-feedback" => Route::SubmitFeedback,
            "/admin" => Route::AdminDashboard,
            other => match other.strip_prefix("/feedback/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::FeedbackDetail(FeedbackId::new(id))
                }
                _ => Route::NotFound,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_owned(),
            Route::Dashboard => "/dashboard".to_owned(),
            Route::Login => "/login".to_owned(),
            Route::Register => "/register".to_owned(),
            Route::SubmitFeedback => "/submit-feedback".to_owned(),
            Route::FeedbackDetail(id) => format!("/feedback/{id}"),
            Route::AdminDashboard => "/admin".to_owned(),
            Route::NotFound => "/404".to_owned(),
        }
    }

    /// Reachable without signing in.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::Login | Route::Register | Route::NotFound
        )
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::AdminDashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    AccessDenied,
    FeedbackNotFound,
}

impl DenyReason {
    /// Message for the transient notification shown after the redirect.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "Please sign in to continue.",
            DenyReason::AccessDenied => {
                "You don't have permission to access the admin dashboard."
            }
            DenyReason::FeedbackNotFound => "The requested feedback could not be found.",
        }
    }
}

/// Outcome of a route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect { to: Route, reason: DenyReason },
}

/// Decide whether `viewer` may open `route`.
pub fn guard(route: &Route, viewer: Option<&Identity>) -> Access {
    if route.is_public() {
        return Access::Allow;
    }

    let Some(viewer) = viewer else {
        return Access::Redirect {
            to: Route::Login,
            reason: DenyReason::NotAuthenticated,
        };
    };

    if route.requires_admin() && !viewer.is_admin() {
        return Access::Redirect {
            to: Route::Dashboard,
            reason: DenyReason::AccessDenied,
        };
    }

    Access::Allow
}

/// Like [`guard`], and additionally send detail links to missing items back
/// to the dashboard.
pub fn resolve<S: KvStore>(
    route: &Route,
    viewer: Option<&Identity>,
    feedback: &FeedbackStore<S>,
) -> Access {
    match guard(route, viewer) {
        Access::Allow => match route {
            Route::FeedbackDetail(id) if feedback.get_by_id(id).is_none() => Access::Redirect {
                to: Route::Dashboard,
                reason: DenyReason::FeedbackNotFound,
            },
            _ => Access::Allow,
        },
        redirect => redirect,
    }
}
