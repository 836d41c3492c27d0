//! Process-wide session store.
//!
//! Created once at startup and shared by every turn. The map itself sits
//! behind an `RwLock`; each context has its own async mutex, so turns of one
//! session run one at a time while different sessions proceed in parallel.
//! Entries are never removed unless an [`EvictionPolicy`] is configured.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::SessionContext;

/// Optional bounds on how many sessions are kept and for how long.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Drop sessions not touched for this long.
    pub idle_ttl: Option<Duration>,
    /// Drop the least recently used session when a new one would exceed this.
    pub max_sessions: Option<usize>,
}

struct Entry {
    context: Arc<Mutex<SessionContext>>,
    last_active: DateTime<Utc>,
    sequence: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_sequence: u64,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn evict_idle(&mut self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|id, entry| {
            let keep = now - entry.last_active <= ttl;
            if !keep {
                debug!(session_id = %id, "evicting idle session");
            }
            keep
        });
        before - self.entries.len()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.sequence)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            warn!(session_id = %id, "session limit reached, evicting least recently used session");
            self.entries.remove(&id);
        }
    }
}

/// Map from session id to its context.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<Inner>,
    policy: EvictionPolicy,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SessionStore {
    /// Store without eviction: entries live for the process lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: EvictionPolicy) -> Self {
        Self {
            inner: RwLock::default(),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Return the context for `id`, creating it on first use.
    ///
    /// `None` mints a fresh UUID. The returned id is the one the context is
    /// stored under.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, Arc<Mutex<SessionContext>>) {
        let now = Utc::now();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(ttl) = self.policy.idle_ttl {
            inner.evict_idle(ttl, now);
        }

        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let sequence = inner.tick();

        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.last_active = now;
            entry.sequence = sequence;
            return (id, entry.context.clone());
        }

        if let Some(max) = self.policy.max_sessions {
            while inner.entries.len() >= max.max(1) {
                inner.evict_least_recent();
            }
        }

        debug!(session_id = %id, "creating session");
        let context = Arc::new(Mutex::new(SessionContext::new(id.clone())));
        inner.entries.insert(
            id.clone(),
            Entry {
                context: context.clone(),
                last_active: now,
                sequence,
            },
        );
        (id, context)
    }

    /// Look up an existing session without creating or touching it.
    pub fn get(&self, id: &str) -> Option<Arc<Mutex<SessionContext>>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(id).map(|entry| entry.context.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn session_ids(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.keys().cloned().collect()
    }

    /// Remove sessions idle longer than the policy's TTL as of `now`.
    ///
    /// Returns how many were removed; always 0 without a TTL.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.policy.idle_ttl else {
            return 0;
        };
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.evict_idle(ttl, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_mints_a_uuid() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(None);
        assert!(Uuid::parse_str(&id).is_ok());
        assert!(store.contains(&id));
    }

    #[tokio::test]
    async fn existing_id_returns_same_context() {
        let store = SessionStore::new();
        let (id, first) = store.get_or_create(None);
        first.lock().await.add_message("hi");

        let (same_id, second) = store.get_or_create(Some(&id));
        assert_eq!(same_id, id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.user_messages().to_vec(), vec!["hi".to_string()]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_id_is_created_under_that_id() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(Some("client-chosen"));
        assert_eq!(id, "client-chosen");
        assert!(store.get("client-chosen").is_some());
    }

    #[test]
    fn without_policy_nothing_is_evicted() {
        let store = SessionStore::new();
        store.get_or_create(Some("a"));
        let far_future = Utc::now() + chrono::Duration::days(365);
        assert_eq!(store.evict_idle(far_future), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn idle_sessions_are_evicted_after_ttl() {
        let store = SessionStore::with_policy(EvictionPolicy {
            idle_ttl: Some(Duration::from_secs(60)),
            max_sessions: None,
        });
        store.get_or_create(Some("a"));
        store.get_or_create(Some("b"));

        assert_eq!(store.evict_idle(Utc::now()), 0);
        let later = Utc::now() + chrono::Duration::seconds(61);
        assert_eq!(store.evict_idle(later), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn least_recently_used_session_is_evicted_at_capacity() {
        let store = SessionStore::with_policy(EvictionPolicy {
            idle_ttl: None,
            max_sessions: Some(2),
        });
        store.get_or_create(Some("a"));
        store.get_or_create(Some("b"));
        store.get_or_create(Some("a"));
        store.get_or_create(Some("c"));

        let mut ids = store.session_ids();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
    }
}
