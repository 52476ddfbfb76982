//! File-backed durable session store

use async_trait::async_trait;
use directories::ProjectDirs;
use portico_core::store::{PROFILE_KEY, TOKEN_KEY};
use portico_core::{CoreError, CoreResult, PersistedSession, SessionStore, UserProfile};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Session store backed by a single JSON document on disk
///
/// The document holds the same two string entries a browser's key-value
/// storage would: the raw token and the profile as JSON text.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at an explicit location
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform state directory
    pub fn at_default_location() -> Self {
        let path = ProjectDirs::from("dev", "Portico", "Portico-Console")
            .map(|dirs| dirs.data_dir().join("session.json"))
            .unwrap_or_else(|| {
                warn!("failed to determine platform-specific directories, using ./data");
                PathBuf::from("./data/session.json")
            });
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> PersistedSession {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no persisted session");
                return PersistedSession::default();
            }
        };
        let entries: Map<String, Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "persisted session is unreadable");
                return PersistedSession::default();
            }
        };
        let token = entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let profile = entries
            .get(PROFILE_KEY)
            .and_then(Value::as_str)
            .and_then(|raw| serde_json::from_str::<UserProfile>(raw).ok())
            .unwrap_or_default();
        PersistedSession { token, profile }
    }

    async fn save(&self, token: &str, profile: &UserProfile) -> CoreResult<()> {
        let profile_raw = serde_json::to_string(profile)
            .map_err(|err| CoreError::serialization_error(err.to_string()))?;
        let mut entries = Map::new();
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        entries.insert(PROFILE_KEY.to_string(), Value::String(profile_raw));
        let document = serde_json::to_vec_pretty(&entries)
            .map_err(|err| CoreError::serialization_error(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| CoreError::io_error(err.to_string()))?;
        }
        // Write-then-rename so a reload never observes a torn document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &document)
            .await
            .map_err(|err| CoreError::io_error(err.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| CoreError::io_error(err.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CoreError::io_error(err.to_string())),
        }
    }
}
