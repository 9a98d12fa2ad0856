//! In-process session store

use super::traits::{SessionHandle, SessionStore};
use super::SessionBlob;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Upper bound on how often the idle sweeper runs
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

/// Sessions kept in memory.
///
/// A session not used for a chat turn within the idle timeout is dropped by
/// [`evict_idle`](Self::evict_idle); run it periodically with
/// [`spawn_idle_sweeper`](Self::spawn_idle_sweeper).
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle).await
    }

    async fn evict_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            // A locked session is mid-turn
            let busy = entry.handle.try_lock().is_err();
            busy || now.saturating_duration_since(entry.last_used) <= max_idle
        });
        before - sessions.len()
    }

    /// Evict idle sessions in the background until the process exits.
    pub fn spawn_idle_sweeper(self: Arc<Self>, max_idle: Duration) -> JoinHandle<()> {
        let period = max_idle.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = self.session_count().await;
                    tracing::info!(
                        evicted,
                        remaining,
                        "Evicted idle sessions"
                    );
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "Creating session");
                SessionEntry {
                    handle: Arc::new(Mutex::new(SessionBlob::default())),
                    last_used: Instant::now(),
                }
            });
        entry.last_used = Instant::now();
        entry.handle.clone()
    }

    async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|entry| entry.handle.clone())
    }

    async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::Step;

    const IDLE: Duration = Duration::from_secs(30 * 60);

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let store = InMemorySessionStore::new();
        let a = store.get_or_create("abc").await;
        a.lock().await.dialogue.step = Step::Quantity;

        let b = store.get_or_create("abc").await;
        assert_eq!(b.lock().await.dialogue.step, Step::Quantity);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let store = InMemorySessionStore::new();
        assert!(store.get("missing").await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemorySessionStore::new();
        store.get_or_create("abc").await;
        assert!(store.remove("abc").await);
        assert!(!store.remove("abc").await);
        assert!(store.get("abc").await.is_none());
    }

    #[tokio::test]
    async fn test_recent_sessions_survive_eviction() {
        let store = InMemorySessionStore::new();
        store.get_or_create("a").await;
        store.get_or_create("b").await;
        assert_eq!(store.evict_idle(IDLE).await, 0);
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = InMemorySessionStore::new();
        store.get_or_create("a").await;
        store.get_or_create("b").await;

        let later = Instant::now() + IDLE + Duration::from_secs(1);
        assert_eq!(store.evict_idle_at(later, IDLE).await, 2);
        assert_eq!(store.session_count().await, 0);
        assert!(store.get("a").await.is_none());
    }

    #[tokio::test]
    async fn test_session_mid_turn_is_not_evicted() {
        let store = InMemorySessionStore::new();
        let busy = store.get_or_create("busy").await;
        store.get_or_create("idle").await;
        let _guard = busy.lock().await;

        let later = Instant::now() + IDLE + Duration::from_secs(1);
        assert_eq!(store.evict_idle_at(later, IDLE).await, 1);
        assert!(store.get("busy").await.is_some());
        assert!(store.get("idle").await.is_none());
    }
}
