//! Normalized request outcomes

use std::fmt;
use thiserror::Error;

/// Message used when no usable message accompanied a failure
pub const SYSTEM_ERROR_MESSAGE: &str = "system error";

/// Coarse classification of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    ServerError,
    Unknown,
}

impl FailureKind {
    /// Classify an HTTP status the backend answered with
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Default user-facing message for this class
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Unauthenticated => "not logged in or token expired",
            Self::Forbidden => "access denied",
            Self::NotFound => "resource not found",
            Self::ServerError => "internal server error",
            Self::Unknown => "network error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not-found",
            Self::ServerError => "server-error",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Failed outcome of one pipeline invocation
///
/// By the time a caller sees one of these, the pipeline has already
/// notified the user and performed any session teardown the failure
/// required. Callers branch on the variant; they do not repeat those side
/// effects.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport succeeded but the backend rejected the request
    #[error("{message}")]
    Business { message: String },

    /// No valid business envelope was received
    #[error("{kind}: {message}")]
    Transport {
        kind: FailureKind,
        message: String,
    },

    /// A success payload did not match the caller's expected type
    #[error("payload decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client was misconfigured
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn business(message: impl Into<String>) -> Self {
        Self::Business {
            message: message.into(),
        }
    }

    pub fn transport(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// True when this failure already invalidated the session
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: FailureKind::Unauthenticated,
                ..
            }
        )
    }
}
