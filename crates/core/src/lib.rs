//! Portico core types and ports

pub mod error;
pub mod ports;
pub mod routes;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use ports::{Navigator, Notifier, SessionSink, TokenSource, TracingNotifier};
pub use routes::{Route, RouteTable};
pub use store::{MemorySessionStore, PersistedSession, SessionStore};
pub use types::{Session, UserProfile};
