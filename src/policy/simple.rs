//! Unbounded map with per-entry expiration.
//!
//! No capacity and no eviction: entries leave only through `delete`, `clear`
//! or a lazy expiry observed by `get`/`set`. Useful as a reference model for
//! the bounded engines, which share its key and TTL semantics.

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::InvariantError;
use crate::expiry::{deadline_after, is_expired};
use crate::traits::CacheCore;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// Hash map of values with optional deadlines.
///
/// ```
/// use std::time::{Duration, Instant};
/// use evictkit::policy::simple::SimpleStore;
/// use evictkit::traits::CacheCore;
///
/// let now = Instant::now();
/// let mut store = SimpleStore::new();
/// store.set("session", 7, Duration::from_secs(30), now);
/// assert_eq!(store.get(&"session", now), Some(&7));
/// assert_eq!(store.get(&"session", now + Duration::from_secs(30)), None);
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct SimpleStore<K, V> {
    map: FxHashMap<K, Entry<V>>,
}

impl<K, V> SimpleStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }
}

impl<K, V> Default for SimpleStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheCore<K, V> for SimpleStore<K, V>
where
    K: Eq + Hash,
{
    fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        self.map.insert(
            key,
            Entry {
                value,
                expires_at: deadline_after(now, ttl),
            },
        );
    }

    fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        let expired = is_expired(self.map.get(key)?.expires_at, now);
        if expired {
            self.map.remove(key);
            trace!("simple store dropped expired entry");
            return None;
        }
        self.map.get(key).map(|entry| &entry.value)
    }

    fn delete(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn contains(&self, key: &K, now: Instant) -> bool {
        self.map
            .get(key)
            .is_some_and(|entry| !is_expired(entry.expires_at, now))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        Ok(())
    }
}
