//! In-memory session store with per-session locking and idle eviction.
//!
//! Each session lives behind its own `tokio::sync::Mutex`, so updates to
//! one conversation serialize while unrelated conversations proceed
//! independently. The outer map lock is held only long enough to look up
//! or insert an entry, never across an update closure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::Session;

/// Tuning for the in-memory store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Inactivity window after which a session is evicted.
    pub idle_window_secs: u64,
    /// How long one lock acquisition may wait before counting as a
    /// failed attempt.
    pub lock_timeout: Duration,
    /// Bounded number of lock attempts before surfacing contention.
    pub lock_attempts: u32,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            idle_window_secs: 1800,
            lock_timeout: Duration::from_millis(250),
            lock_attempts: 3,
        }
    }
}

/// Store-level errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Update requested on a session that does not exist (never created,
    /// evicted, or reset).
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The per-session lock stayed contended through the bounded retry
    /// budget.
    #[error("session lock contended: {0}")]
    Contended(SessionId),
}

type Slot = Arc<Mutex<Session>>;

/// Owns all per-conversation state.
///
/// Guarantees at most one in-flight update per session; updates to
/// different sessions never block each other. Eviction and update are
/// mutually exclusive per session: the sweep skips any entry whose lock
/// is currently held.
#[derive(Debug)]
pub struct InMemorySessionStore {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<SessionId, Slot>>,
}

impl InMemorySessionStore {
    /// Creates a store with the given configuration.
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SessionStoreConfig::default())
    }

    /// Returns a snapshot of the session, creating it first if unseen.
    ///
    /// Never errors. A stored session already past the idle window is
    /// replaced with a fresh one rather than resurrected: the caller
    /// observes the same behavior whether or not the sweep got there
    /// first.
    pub async fn get_or_create(&self, id: &SessionId) -> Session {
        let now = Timestamp::now();

        // Fast path: existing, fresh session.
        if let Some(slot) = self.lookup(id).await {
            let session = slot.lock().await;
            if !session.is_idle(&now, self.config.idle_window_secs) {
                return session.clone();
            }
        }

        // Slow path: insert fresh state, replacing a stale entry if one
        // is still around.
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some(slot) => {
                let mut session = slot.lock().await;
                if session.is_idle(&now, self.config.idle_window_secs) {
                    tracing::info!(session_id = %id, "replacing idle session");
                    *session = Session::new(id.clone());
                }
                session.clone()
            }
            None => {
                tracing::debug!(session_id = %id, "creating session");
                let session = Session::new(id.clone());
                sessions.insert(id.clone(), Arc::new(Mutex::new(session.clone())));
                session
            }
        }
    }

    /// Atomic read-modify-write of exactly one session.
    ///
    /// The closure runs under the per-session lock; the outer map lock is
    /// released before the closure runs, so updates never block other
    /// sessions.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    /// - `Contended` if the lock stayed busy through the retry budget
    pub async fn apply_update<T>(
        &self,
        id: &SessionId,
        update: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, StoreError> {
        let slot = self
            .lookup(id)
            .await
            .ok_or_else(|| StoreError::SessionNotFound(id.clone()))?;

        let mut guard = self.acquire(id, &slot).await?;
        Ok(update(&mut guard))
    }

    /// Discards the named session entirely.
    ///
    /// Returns true if a session existed. The entry is only removed when
    /// its per-session lock is free, so a reset never interleaves with an
    /// in-flight update; a busy lock is retried within the same bounded
    /// budget as updates.
    pub async fn reset(&self, id: &SessionId) -> Result<bool, StoreError> {
        for _attempt in 1..=self.config.lock_attempts {
            {
                let mut sessions = self.sessions.write().await;
                let Some(slot) = sessions.get(id) else {
                    return Ok(false);
                };
                if slot.try_lock().is_ok() {
                    sessions.remove(id);
                    tracing::info!(session_id = %id, "session reset");
                    return Ok(true);
                }
            }
            // An update is in flight; let it finish before retrying.
            tokio::time::sleep(self.config.lock_timeout).await;
        }
        Err(StoreError::Contended(id.clone()))
    }

    /// Removes every session idle past the configured window.
    ///
    /// Entries whose per-session lock is currently held are skipped;
    /// they will be revisited on the next sweep. Returns the number of
    /// evicted sessions.
    pub async fn evict_expired(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, slot| match slot.try_lock() {
            Ok(session) => {
                let expired = session.is_idle(&now, self.config.idle_window_secs);
                if expired {
                    tracing::debug!(session_id = %id, "evicting idle session");
                }
                !expired
            }
            // An update is in flight; by definition not idle.
            Err(_) => true,
        });

        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True if no sessions are tracked.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops all sessions. Used on shutdown.
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Spawns the periodic eviction sweep.
    ///
    /// Eviction never runs synchronously inside a request path; this
    /// task is the only caller in production.
    pub fn spawn_sweep(store: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let evicted = store.evict_expired(Timestamp::now()).await;
                if evicted > 0 {
                    tracing::info!(evicted, "idle session sweep");
                }
            }
        })
    }

    async fn lookup(&self, id: &SessionId) -> Option<Slot> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn acquire<'a>(
        &self,
        id: &SessionId,
        slot: &'a Slot,
    ) -> Result<tokio::sync::MutexGuard<'a, Session>, StoreError> {
        for attempt in 1..=self.config.lock_attempts {
            match tokio::time::timeout(self.config.lock_timeout, slot.lock()).await {
                Ok(guard) => return Ok(guard),
                Err(_) => {
                    tracing::warn!(session_id = %id, attempt, "session lock attempt timed out");
                }
            }
        }
        Err(StoreError::Contended(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::with_defaults()
    }

    fn counterpart(text: &str) -> Message {
        Message::counterpart(text, Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_creates_once() {
        let store = store();
        let id = SessionId::new("s-1");

        let first = store.get_or_create(&id).await;
        assert!(first.messages().is_empty());

        store
            .apply_update(&id, |s| s.record_message(counterpart("hello")))
            .await
            .unwrap();

        let second = store.get_or_create(&id).await;
        assert_eq!(second.messages().len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn apply_update_on_unknown_session_errors() {
        let store = store();
        let result = store
            .apply_update(&SessionId::new("ghost"), |_| ())
            .await;
        assert!(matches!(result, Err(StoreError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn apply_update_returns_closure_value() {
        let store = store();
        let id = SessionId::new("s-1");
        store.get_or_create(&id).await;

        let count = store
            .apply_update(&id, |s| {
                s.record_message(counterpart("one"));
                s.messages().len()
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn reset_discards_state() {
        let store = store();
        let id = SessionId::new("s-1");
        store.get_or_create(&id).await;
        store
            .apply_update(&id, |s| s.record_message(counterpart("hello")))
            .await
            .unwrap();

        assert!(store.reset(&id).await.unwrap());
        assert!(store.is_empty().await);

        // Fresh state on the next call.
        let fresh = store.get_or_create(&id).await;
        assert!(fresh.messages().is_empty());
    }

    #[tokio::test]
    async fn reset_of_unknown_session_is_a_noop() {
        let store = store();
        assert!(!store.reset(&SessionId::new("ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn evict_expired_removes_only_idle_sessions() {
        let store = store();
        let fresh = SessionId::new("fresh");
        let stale = SessionId::new("stale");
        store.get_or_create(&fresh).await;
        store.get_or_create(&stale).await;

        // Both sessions were just touched; sweep far in the future
        // removes both, sweep now removes none.
        assert_eq!(store.evict_expired(Timestamp::now()).await, 0);
        assert_eq!(store.len().await, 2);

        let later = Timestamp::now().plus_secs(3600);
        assert_eq!(store.evict_expired(later).await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn eviction_skips_sessions_mid_update() {
        let store = Arc::new(store());
        let id = SessionId::new("busy");
        store.get_or_create(&id).await;

        // Hold the per-session lock directly to simulate an in-flight
        // update.
        let slot = store.lookup(&id).await.unwrap();
        let guard = slot.lock().await;

        let far_future = Timestamp::now().plus_secs(7200);
        assert_eq!(store.evict_expired(far_future).await, 0);
        assert_eq!(store.len().await, 1);

        drop(guard);
        assert_eq!(store.evict_expired(far_future).await, 1);
    }

    #[tokio::test]
    async fn stale_session_is_replaced_on_access() {
        let config = SessionStoreConfig {
            idle_window_secs: 0,
            ..SessionStoreConfig::default()
        };
        let store = InMemorySessionStore::new(config);
        let id = SessionId::new("s-1");

        store.get_or_create(&id).await;
        store
            .apply_update(&id, |s| s.record_message(counterpart("old world")))
            .await
            .unwrap();

        // Window of zero seconds: any elapsed time makes it stale.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let revisited = store.get_or_create(&id).await;
        assert!(
            revisited.messages().is_empty(),
            "stale session must not be resurrected"
        );
    }

    #[tokio::test]
    async fn contended_lock_surfaces_after_bounded_retries() {
        let config = SessionStoreConfig {
            lock_timeout: Duration::from_millis(10),
            lock_attempts: 2,
            ..SessionStoreConfig::default()
        };
        let store = Arc::new(InMemorySessionStore::new(config));
        let id = SessionId::new("hot");
        store.get_or_create(&id).await;

        let slot = store.lookup(&id).await.unwrap();
        let guard = slot.lock().await;

        let result = store.apply_update(&id, |_| ()).await;
        assert!(matches!(result, Err(StoreError::Contended(_))));
        drop(guard);

        // Lock released: the same update now succeeds.
        assert!(store.apply_update(&id, |_| ()).await.is_ok());
    }

    #[tokio::test]
    async fn updates_to_different_sessions_do_not_block() {
        let store = Arc::new(store());
        let busy = SessionId::new("busy");
        let free = SessionId::new("free");
        store.get_or_create(&busy).await;
        store.get_or_create(&free).await;

        let slot = store.lookup(&busy).await.unwrap();
        let guard = slot.lock().await;

        // The other session stays fully usable while `busy` is locked.
        store
            .apply_update(&free, |s| s.record_message(counterpart("hi")))
            .await
            .unwrap();
        drop(guard);
    }

    #[tokio::test]
    async fn concurrent_updates_to_one_session_all_apply() {
        let store = Arc::new(store());
        let id = SessionId::new("s-1");
        store.get_or_create(&id).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .apply_update(&id, move |s| {
                        s.record_message(
                            Message::counterpart(format!("msg {i}"), Timestamp::now()).unwrap(),
                        )
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = store.get_or_create(&id).await;
        assert_eq!(session.messages().len(), 16);
    }
}
