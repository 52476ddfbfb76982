//! Session domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile key carrying the role indicator
pub const ADMIN_ROLE_KEY: &str = "admin";

/// Value of [`ADMIN_ROLE_KEY`] that marks an administrator account
pub const ADMIN_ROLE_VALUE: i64 = 1;

/// User attributes as returned by the backend on login
///
/// The backend owns the shape of this object; the console only reads the
/// role indicator and round-trips everything else untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this profile belongs to an administrator
    ///
    /// True only when the role indicator is present and matches exactly; a
    /// missing key, a non-integer value, or any other value means a regular
    /// account.
    pub fn is_admin(&self) -> bool {
        self.0.get(ADMIN_ROLE_KEY).and_then(Value::as_i64) == Some(ADMIN_ROLE_VALUE)
    }
}

impl From<Map<String, Value>> for UserProfile {
    fn from(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }
}

/// Current authentication state: a token and the profile it belongs to
///
/// An empty token means unauthenticated, and an unauthenticated session
/// always carries an empty profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub profile: UserProfile,
}

impl Session {
    /// Build an authenticated session
    pub fn authenticated(token: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            token: token.into(),
            profile,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Reset to the unauthenticated state, dropping both fields together
    pub fn clear(&mut self) {
        self.token.clear();
        self.profile = UserProfile::default();
    }
}
