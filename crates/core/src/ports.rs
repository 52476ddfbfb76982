//! Capability ports injected into the pipeline and the guard
//!
//! The session layer never talks to a concrete UI. Message display and
//! route changes go through these traits so the core stays testable
//! without one.

use async_trait::async_trait;

/// Read access to the current credential
pub trait TokenSource: Send + Sync {
    /// The current token, or `None` when unauthenticated
    fn token(&self) -> Option<String>;
}

/// Fire-and-forget user-facing message display
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Route change requests issued by the pipeline and the guard
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Session invalidation hook
///
/// Clears the in-memory session and its durable mirror. Invoked by the
/// request pipeline when the backend signals an auth failure.
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn clear_session(&self);
}

/// Headless notifier that forwards messages to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
