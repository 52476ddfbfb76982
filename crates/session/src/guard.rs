//! Navigation gating

use crate::state::SessionState;
use portico_core::{Notifier, Route, routes};
use std::sync::Arc;
use tracing::debug;

/// Message shown when a non-admin reaches for admin-only content
const ACCESS_DENIED_MESSAGE: &str = "access denied";

/// Decision for one attempted route transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Continue to the requested route
    Proceed,
    /// Abort and go to this path instead
    Redirect(String),
}

/// Gates every route transition on the current session
pub struct NavigationGuard {
    state: Arc<SessionState>,
    notifier: Arc<dyn Notifier>,
}

impl NavigationGuard {
    pub fn new(state: Arc<SessionState>, notifier: Arc<dyn Notifier>) -> Self {
        Self { state, notifier }
    }

    /// Decide one transition; `from` is the origin route, if any
    ///
    /// The auth check strictly precedes the admin check, and an admin-only
    /// route is implicitly login-gated: a visitor without a session goes to
    /// login, never to an "access denied" message.
    pub fn evaluate(&self, to: &Route, from: Option<&Route>) -> GuardVerdict {
        if (to.requires_auth || to.requires_admin) && !self.state.is_authenticated() {
            debug!(path = %to.path, "unauthenticated transition, redirecting to login");
            return GuardVerdict::Redirect(routes::LOGIN_PATH.to_string());
        }
        if to.requires_admin && !self.state.is_admin() {
            self.notifier.notify(ACCESS_DENIED_MESSAGE);
            let back = from
                .map(|route| route.path.clone())
                .unwrap_or_else(|| routes::ADMIN_HOME_PATH.to_string());
            debug!(path = %to.path, %back, "admin-only transition denied");
            return GuardVerdict::Redirect(back);
        }
        GuardVerdict::Proceed
    }
}
