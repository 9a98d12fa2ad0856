//! Trait abstractions for session storage
//!
//! The engine itself is storage-agnostic; transports that keep sessions
//! server-side go through [`SessionStore`].

use super::SessionBlob;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Exclusive access to one session's blob. Holding the lock for the whole
/// turn serializes concurrent requests for the same session.
pub type SessionHandle = Arc<Mutex<SessionBlob>>;

/// Server-side storage for session blobs
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session, creating an empty one if it does not exist yet
    async fn get_or_create(&self, session_id: &str) -> SessionHandle;

    /// Get an existing session
    async fn get(&self, session_id: &str) -> Option<SessionHandle>;

    /// Forget a session. Returns whether it existed.
    async fn remove(&self, session_id: &str) -> bool;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        (**self).get_or_create(session_id).await
    }

    async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        (**self).get(session_id).await
    }

    async fn remove(&self, session_id: &str) -> bool {
        (**self).remove(session_id).await
    }
}
