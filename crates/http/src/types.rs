//! Wire types shared with the backend

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope `code` signalling business success
pub const CODE_SUCCESS: i64 = 200;

/// Envelope `code` signalling an expired or missing login
///
/// Distinct from the HTTP 401 status: some backends answer 200 at the
/// transport level and carry the auth failure inside the envelope.
pub const CODE_AUTH_EXPIRED: i64 = 401;

/// Business envelope wrapping every JSON response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    pub fn is_auth_expired(&self) -> bool {
        self.code == CODE_AUTH_EXPIRED
    }
}

/// Error body some backends attach to non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
