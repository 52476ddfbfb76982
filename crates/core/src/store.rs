//! Durable session storage

use crate::error::{CoreError, CoreResult};
use crate::types::UserProfile;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key holding the raw token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the profile as JSON text
pub const PROFILE_KEY: &str = "user";

/// Durable values read back at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedSession {
    pub token: String,
    pub profile: UserProfile,
}

/// Durable key-value storage for the current session
///
/// `load` never fails: absent or unreadable data comes back as the
/// unauthenticated defaults. `save` writes both entries as one durable
/// update; it and `clear` report errors so callers can log them, but no
/// caller treats them as fatal.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> PersistedSession;
    async fn save(&self, token: &str, profile: &UserProfile) -> CoreResult<()>;
    async fn clear(&self) -> CoreResult<()>;
}

/// In-memory store with browser-storage semantics
///
/// Holds the same two string entries a durable store would; useful as the
/// reference implementation and for tests that simulate process restarts
/// by re-hydrating from the same store instance.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> PersistedSession {
        let entries = self.entries.lock().expect("session store lock poisoned");
        let token = entries.get(TOKEN_KEY).cloned().unwrap_or_default();
        let profile = entries
            .get(PROFILE_KEY)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        PersistedSession { token, profile }
    }

    async fn save(&self, token: &str, profile: &UserProfile) -> CoreResult<()> {
        let raw = serde_json::to_string(profile)
            .map_err(|err| CoreError::serialization_error(err.to_string()))?;
        let mut entries = self.entries.lock().expect("session store lock poisoned");
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        entries.insert(PROFILE_KEY.to_string(), raw);
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        let mut entries = self.entries.lock().expect("session store lock poisoned");
        entries.remove(TOKEN_KEY);
        entries.remove(PROFILE_KEY);
        Ok(())
    }
}
