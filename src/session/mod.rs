//! Session tracking: platform conversation handles mapped to remote
//! context/task identifiers, with TTL expiry to bound memory growth.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A tracked mapping from a platform conversation handle to the remote
/// protocol's identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSession {
    /// Remote conversation-thread identifier.
    pub context_id: String,
    /// Remote stateful-task identifier; present only while the agent
    /// expects another turn in the same task.
    pub task_id: Option<String>,
    expires_at: Instant,
}

impl TrackedSession {
    fn new(context_id: String, task_id: Option<String>, ttl: Duration) -> Self {
        Self {
            context_id,
            task_id,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Maps conversation handles to [`TrackedSession`] entries with per-entry TTL.
///
/// Entries expire `ttl` after their last `store` and are pruned lazily on
/// any access; there is no background timer. Not internally synchronized —
/// each tracker is owned by exactly one bridge instance.
#[derive(Debug)]
pub struct SessionTracker {
    ttl: Duration,
    entries: HashMap<String, TrackedSession>,
}

impl SessionTracker {
    /// Create a tracker with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up the session for a handle, pruning expired entries first.
    ///
    /// Returns `None` if the handle was never stored or its entry expired.
    pub fn get(&mut self, handle: &str) -> Option<&TrackedSession> {
        self.prune_expired();
        self.entries.get(handle)
    }

    /// Store or replace the mapping for a handle, resetting its TTL.
    ///
    /// Replacement is unconditional and total: storing without a `task_id`
    /// clears any previously tracked task.
    pub fn store(&mut self, handle: &str, context_id: impl Into<String>, task_id: Option<String>) {
        self.prune_expired();
        self.entries.insert(
            handle.to_string(),
            TrackedSession::new(context_id.into(), task_id, self.ttl),
        );
    }

    /// Remove the mapping for a handle; no-op if absent.
    pub fn remove(&mut self, handle: &str) {
        self.entries.remove(handle);
    }

    /// Number of live (stored, possibly expired-but-unpruned) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prune_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, session| !session.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_stored_session() {
        let mut tracker = SessionTracker::new(Duration::from_secs(300));
        tracker.store("conv-1", "ctx-a", Some("task-1".to_string()));

        let session = tracker.get("conv-1").expect("session present");
        assert_eq!(session.context_id, "ctx-a");
        assert_eq!(session.task_id.as_deref(), Some("task-1"));
    }

    #[test]
    fn get_unknown_handle_is_none() {
        let mut tracker = SessionTracker::new(Duration::from_secs(300));
        assert!(tracker.get("missing").is_none());
    }

    #[test]
    fn entry_expires_after_ttl() {
        let mut tracker = SessionTracker::new(Duration::from_millis(100));
        tracker.store("conv-1", "ctx-a", None);
        std::thread::sleep(Duration::from_millis(150));
        assert!(tracker.get("conv-1").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn store_replaces_entirely() {
        let mut tracker = SessionTracker::new(Duration::from_secs(300));
        tracker.store("c1", "ctx-a", Some("t1".to_string()));
        tracker.store("c1", "ctx-b", None);

        let session = tracker.get("c1").expect("session present");
        assert_eq!(session.context_id, "ctx-b");
        assert!(session.task_id.is_none(), "old task id must not be retained");
    }

    #[test]
    fn prune_leaves_fresh_entries_alone() {
        let mut tracker = SessionTracker::new(Duration::from_millis(100));
        tracker.store("a", "ctx-a", None);
        std::thread::sleep(Duration::from_millis(150));
        tracker.store("b", "ctx-b", None);

        assert!(tracker.get("a").is_none());
        assert!(tracker.get("b").is_some());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut tracker = SessionTracker::new(Duration::from_secs(300));
        tracker.store("c1", "ctx-a", None);
        tracker.remove("c1");
        tracker.remove("c1");
        assert!(tracker.get("c1").is_none());
    }
}
