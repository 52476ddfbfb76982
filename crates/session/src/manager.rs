//! Session lifecycle orchestration

use crate::state::SessionState;
use portico_core::{Navigator, UserProfile, routes};
use portico_http::ConsoleClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Backend endpoint notified on logout
///
/// Its response is ignored beyond completion or failure.
pub const LOGOUT_ENDPOINT: &str = "/user/logout";

/// Orchestrates the session lifecycle on top of [`SessionState`]
pub struct SessionManager {
    state: Arc<SessionState>,
    client: ConsoleClient,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    pub fn new(
        state: Arc<SessionState>,
        client: ConsoleClient,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state,
            client,
            navigator,
        }
    }

    /// Shared session state, for wiring readers like the navigation guard
    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        self.state.set_token(token).await;
    }

    pub async fn set_profile(&self, profile: UserProfile) {
        self.state.set_profile(profile).await;
    }

    /// Install a fresh login in one durable update
    pub async fn establish(&self, token: impl Into<String>, profile: UserProfile) {
        self.state.establish(token, profile).await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.is_admin()
    }

    /// Sign out
    ///
    /// Notifies the backend best-effort, then unconditionally drops the
    /// local session and goes to the login page. A failed backend call
    /// never leaves the session in place.
    pub async fn logout(&self) {
        if let Err(err) = self.client.post_unit(LOGOUT_ENDPOINT).await {
            warn!(error = %err, "backend logout failed, clearing local session anyway");
        }
        self.state.clear().await;
        self.navigator.push(routes::LOGIN_PATH);
        info!("logged out");
    }
}
