//! Authoritative in-memory session state

use async_trait::async_trait;
use portico_core::{
    PersistedSession, Session, SessionSink, SessionStore, TokenSource, UserProfile,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Authoritative session state
///
/// Hydrated once from the durable store at construction and mirrored back
/// on every mutation. Each mutation updates token and profile under one
/// lock acquisition and one store write, so readers never observe a token
/// without its profile (or the reverse).
pub struct SessionState {
    session: RwLock<Session>,
    store: Arc<dyn SessionStore>,
}

impl SessionState {
    /// Load the persisted session and build the in-memory state from it
    pub async fn hydrate(store: Arc<dyn SessionStore>) -> Arc<Self> {
        let PersistedSession { token, profile } = store.load().await;
        // An empty token always pairs with an empty profile, whatever the
        // store handed back.
        let session = if token.is_empty() {
            Session::default()
        } else {
            Session { token, profile }
        };
        Arc::new(Self {
            session: RwLock::new(session),
            store,
        })
    }

    /// The current token, or `None` when unauthenticated
    pub fn token(&self) -> Option<String> {
        let session = self.read();
        session
            .is_authenticated()
            .then(|| session.token.clone())
    }

    pub fn profile(&self) -> UserProfile {
        self.read().profile.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.read().profile.is_admin()
    }

    /// Replace the token, writing through to the store
    ///
    /// An empty token is a teardown: the profile goes with it.
    pub async fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            self.clear().await;
            return;
        }
        let snapshot = {
            let mut session = self.write();
            session.token = token;
            session.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Replace the profile, writing through to the store
    ///
    /// Ignored while unauthenticated: a profile never exists without a
    /// token.
    pub async fn set_profile(&self, profile: UserProfile) {
        let snapshot = {
            let mut session = self.write();
            if !session.is_authenticated() {
                warn!("dropping profile update on an unauthenticated session");
                return;
            }
            session.profile = profile;
            session.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Install a fresh login: token and profile in one durable update
    pub async fn establish(&self, token: impl Into<String>, profile: UserProfile) {
        let token = token.into();
        if token.is_empty() {
            self.clear().await;
            return;
        }
        let snapshot = {
            let mut session = self.write();
            session.token = token;
            session.profile = profile;
            session.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Reset to the unauthenticated session and erase the durable entries
    pub async fn clear(&self) {
        self.write().clear();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }
    }

    async fn persist(&self, session: &Session) {
        if let Err(err) = self.store.save(&session.token, &session.profile).await {
            warn!(error = %err, "failed to persist session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().expect("session lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().expect("session lock poisoned")
    }
}

impl TokenSource for SessionState {
    fn token(&self) -> Option<String> {
        Self::token(self)
    }
}

#[async_trait]
impl SessionSink for SessionState {
    async fn clear_session(&self) {
        self.clear().await;
    }
}
