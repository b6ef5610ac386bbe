//! Session registry.
//!
//! Maps a session key (one per logical channel) to the running playback's
//! active flag. At most one entry exists per key at any instant.
//!
//! # Single-flight
//!
//! [`Registry::start`] checks for an existing entry and inserts the new one in
//! one critical section with no suspension point in between, so two start
//! requests for the same key can never both succeed.
//!
//! # Leases
//!
//! A successful start returns a [`SessionLease`]. The scheduler owns it for
//! the lifetime of the playback loop and the entry is removed when the lease
//! drops, whether the loop completed, was stopped, failed, or the task was
//! aborted.
//!
//! The map sits behind a `std::sync::Mutex` that is only held for map
//! operations, never across an `.await`.
//!
//! # Stopping
//!
//! Each entry shares a stop signal with its lease: an active flag plus a
//! [`Notify`]. [`Registry::stop`] clears the flag and wakes the loop, so a
//! session parked in a paced or retry wait exits without sleeping it out.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::Notify;
use tracing::debug;

use crate::error::AlreadyActive;

/// Identifies one logical channel; at most one playback runs per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(String);

impl SessionKey {
    /// Wrap a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<u64> for SessionKey {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}

/// Active flag shared by a registry entry and its lease.
#[derive(Debug)]
struct StopSignal {
    active: AtomicBool,
    wake: Notify,
}

impl StopSignal {
    fn new() -> Self {
        Self { active: AtomicBool::new(true), wake: Notify::new() }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Clear the flag and wake the waiting loop. Returns whether it was set.
    fn stop(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::AcqRel);
        if was_active {
            // Stores a permit if the loop is not parked yet.
            self.wake.notify_one();
        }
        was_active
    }
}

#[derive(Debug)]
struct Entry {
    /// Distinguishes this session from a later one under the same key.
    id: u64,
    signal: Arc<StopSignal>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<SessionKey, Entry>,
    next_id: u64,
}

/// Session-key bookkeeping shared by command handlers and playback tasks.
///
/// Cheap to clone; all clones see the same sessions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Inner>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries stay consistent even if a holder panicked mid-operation.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new active session for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyActive`] if an entry exists for `key`, active or
    /// still winding down after a stop.
    pub fn start(&self, key: SessionKey) -> Result<SessionLease, AlreadyActive> {
        let mut inner = self.lock();
        if inner.sessions.contains_key(&key) {
            return Err(AlreadyActive(key));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let signal = Arc::new(StopSignal::new());
        inner.sessions.insert(key.clone(), Entry { id, signal: Arc::clone(&signal) });
        drop(inner);

        debug!(%key, id, "session registered");
        Ok(SessionLease { registry: self.clone(), key, id, signal })
    }

    /// Request the session for `key` to stop.
    ///
    /// Clears the active flag and wakes the playback loop if it is waiting.
    /// Returns `false` if there is no entry or it was already stopping.
    pub fn stop(&self, key: &SessionKey) -> bool {
        let inner = self.lock();
        inner.sessions.get(key).is_some_and(|entry| entry.signal.stop())
    }

    /// Whether `key` has an entry whose flag is still set.
    pub fn is_active(&self, key: &SessionKey) -> bool {
        self.lock().sessions.get(key).is_some_and(|entry| entry.signal.is_active())
    }

    /// Whether `key` has an entry at all, including one winding down.
    pub fn contains(&self, key: &SessionKey) -> bool {
        self.lock().sessions.contains_key(key)
    }

    /// Remove the entry for `key` unconditionally.
    ///
    /// The scheduler relies on [`SessionLease`] instead; this is for callers
    /// that need to clear a key by hand. Stops the entry so a loop still
    /// holding it winds down. Returns whether an entry existed.
    pub fn remove(&self, key: &SessionKey) -> bool {
        let removed = self.lock().sessions.remove(key);
        match removed {
            Some(entry) => {
                entry.signal.stop();
                true
            },
            None => false,
        }
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().sessions.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<SessionKey> {
        let mut keys: Vec<SessionKey> = self.lock().sessions.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn release(&self, key: &SessionKey, id: u64) {
        let mut inner = self.lock();
        if inner.sessions.get(key).is_some_and(|entry| entry.id == id) {
            inner.sessions.remove(key);
            drop(inner);
            debug!(%key, id, "session released");
        }
    }
}

/// Ownership of one registry entry.
///
/// Dropping the lease removes the entry, unless it was already removed and
/// the key reused by a newer session.
#[derive(Debug)]
pub struct SessionLease {
    registry: Registry,
    key: SessionKey,
    id: u64,
    signal: Arc<StopSignal>,
}

impl SessionLease {
    /// Key this lease holds.
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Whether the session may keep sending.
    pub fn is_active(&self) -> bool {
        self.signal.is_active()
    }

    /// Resolves once the session has been asked to stop.
    pub async fn stopped(&self) {
        while self.is_active() {
            self.signal.wake.notified().await;
        }
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.registry.release(&self.key, self.id);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_active(&"main".into()));
    }

    #[test]
    fn start_rejects_duplicate_key() {
        let registry = Registry::new();
        let _lease = registry.start("main".into()).unwrap();

        let second = registry.start("main".into());
        assert_eq!(second.err(), Some(AlreadyActive("main".into())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let registry = Registry::new();
        let _a = registry.start(SessionKey::from(1u64)).unwrap();
        let _b = registry.start(SessionKey::from(2u64)).unwrap();
        assert_eq!(registry.keys(), vec![SessionKey::from(1u64), SessionKey::from(2u64)]);
    }

    #[test]
    fn stop_clears_flag_once() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let lease = registry.start(key.clone()).unwrap();

        assert!(registry.stop(&key));
        assert!(!lease.is_active());
        assert!(!registry.is_active(&key));

        // Second stop reports nothing running; the entry stays until release.
        assert!(!registry.stop(&key));
        assert!(registry.contains(&key));
    }

    #[test]
    fn stop_unknown_key_returns_false() {
        let registry = Registry::new();
        assert!(!registry.stop(&"nowhere".into()));
    }

    #[test]
    fn stopping_session_still_blocks_start() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let _lease = registry.start(key.clone()).unwrap();
        registry.stop(&key);

        assert!(registry.start(key).is_err());
    }

    #[test]
    fn dropping_lease_releases_key() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let lease = registry.start(key.clone()).unwrap();
        drop(lease);

        assert!(registry.is_empty());
        assert!(registry.start(key).is_ok());
    }

    #[test]
    fn stale_lease_does_not_remove_successor() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let stale = registry.start(key.clone()).unwrap();

        assert!(registry.remove(&key));
        assert!(!stale.is_active());

        let fresh = registry.start(key.clone()).unwrap();
        drop(stale);

        assert!(registry.is_active(&key));
        drop(fresh);
        assert!(!registry.contains(&key));
    }

    #[test]
    fn remove_unknown_key_returns_false() {
        let registry = Registry::new();
        assert!(!registry.remove(&"main".into()));
    }

    #[tokio::test]
    async fn stopped_wakes_parked_waiter() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let lease = registry.start(key.clone()).unwrap();

        let waiter = tokio::spawn(async move { lease.stopped().await });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        assert!(registry.stop(&key));
        waiter.await.unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn stopped_resolves_after_earlier_stop() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let lease = registry.start(key.clone()).unwrap();

        registry.stop(&key);
        lease.stopped().await;
    }

    #[tokio::test]
    async fn remove_wakes_parked_waiter() {
        let registry = Registry::new();
        let key = SessionKey::from("main");
        let lease = registry.start(key.clone()).unwrap();

        let waiter = tokio::spawn(async move { lease.stopped().await });
        tokio::task::yield_now().await;

        assert!(registry.remove(&key));
        waiter.await.unwrap();
    }

    proptest! {
        #[test]
        fn stop_reports_true_once_per_session(stops in proptest::collection::vec(0u8..4, 0..32)) {
            let registry = Registry::new();
            let leases: Vec<SessionLease> =
                (0..4u64).map(|k| registry.start(SessionKey::from(k)).unwrap()).collect();

            let mut stopped = [false; 4];
            for &k in &stops {
                let first = !stopped[usize::from(k)];
                prop_assert_eq!(registry.stop(&SessionKey::from(u64::from(k))), first);
                stopped[usize::from(k)] = true;
            }

            for (k, lease) in leases.iter().enumerate() {
                prop_assert_eq!(lease.is_active(), !stopped[k]);
                prop_assert!(registry.contains(lease.key()));
            }
        }
    }
}
