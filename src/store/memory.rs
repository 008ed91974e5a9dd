use super::LockStore;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

/// In-process store with Redis-like expiry semantics.
///
/// Expired keys are treated as absent on every access. Share one instance
/// between several `Mutex` values through an `Arc` to model independent
/// processes contending on the same store.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    round_trips: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            round_trips: AtomicUsize::new(0),
        }
    }

    /// Number of store operations served so far
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Remaining time-to-live of `key`, `None` if absent or persistent
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        let entries = self.live_entries(now);
        entries
            .get(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    fn live_entries(&self, now: Instant) -> MutexGuard<'_, HashMap<String, Entry>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, e| e.expires_at.map_or(true, |at| at > now));
        entries
    }

    fn begin(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        self.live_entries(self.clock.now())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LockStore for MemoryStore {
    fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        let mut entries = self.begin();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(true)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let now = self.clock.now();
        let mut entries = self.begin();

        // Redis deletes the key right away for a zero TTL
        if ttl.is_zero() {
            return Ok(entries.remove(key).is_some());
        }

        match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.begin();
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    fn del(&self, key: &str) -> Result<bool> {
        let mut entries = self.begin();
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_set_nx_only_writes_absent_keys() {
        let store = MemoryStore::new();
        assert!(store.set_nx("k", "a").unwrap());
        assert!(!store.set_nx("k", "b").unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_expired_key_reads_as_absent() {
        let clock = Arc::new(ManualClock::new());
        let store = MemoryStore::with_clock(clock.clone());

        store.set_nx("k", "a").unwrap();
        assert!(store.expire("k", Duration::from_secs(1)).unwrap());
        assert_eq!(store.ttl("k"), Some(Duration::from_secs(1)));

        clock.advance(Duration::from_millis(999));
        assert!(store.get("k").unwrap().is_some());

        clock.advance(Duration::from_millis(1));
        assert!(store.get("k").unwrap().is_none());
        assert!(store.set_nx("k", "b").unwrap());
    }

    #[test]
    fn test_expire_missing_key() {
        let store = MemoryStore::new();
        assert!(!store.expire("missing", Duration::from_secs(5)).unwrap());
    }

    #[test]
    fn test_zero_ttl_removes_key() {
        let store = MemoryStore::new();
        store.set_nx("k", "a").unwrap();
        assert!(store.expire("k", Duration::ZERO).unwrap());
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_del_reports_existence() {
        let store = MemoryStore::new();
        store.set_nx("k", "a").unwrap();
        assert!(store.del("k").unwrap());
        assert!(!store.del("k").unwrap());
        assert_eq!(store.round_trips(), 3);
    }
}
