//! # Least Recently Used (LRU) Engine
//!
//! Bounded cache that evicts the entry whose last access is oldest.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V>                            │
//!   │                                                                  │
//!   │   index: FxHashMap<K, SlotId>                                    │
//!   │   ┌─────────┬─────────┐                                          │
//!   │   │  page_1 │  id_1 ──┼──────────────────────────┐               │
//!   │   │  page_2 │  id_2 ──┼─────────────┐            │               │
//!   │   │  page_3 │  id_3 ──┼──┐          │            │               │
//!   │   └─────────┴─────────┘  │          │            │               │
//!   │                          ▼          ▼            ▼               │
//!   │   order: OrderList<Entry>                                        │
//!   │   head ──► [page_3] ◄──► [page_2] ◄──► [page_1] ◄── tail         │
//!   │   (MRU)     key, value, expires_at                  (LRU, victim)│
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                                          |
//! |------------|------|------------------------------------------------|
//! | `set`      | O(1) | Overwrite moves to front; new key may evict    |
//! | `get`      | O(1) | Hit moves to front; expired entry is dropped   |
//! | `delete`   | O(1) | Unlinks by handle                              |
//! | `peek_lru` | O(1) | Next eviction candidate, no reordering         |
//! | `clear`    | O(n) |                                                |
//!
//! Ties cannot occur: every hit or write is a move-to-front, so the list is a
//! strict recency order.

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{OrderList, SlotId};
use crate::error::{InvariantError, ensure_invariant};
use crate::expiry::{deadline_after, is_expired};
use crate::traits::CacheCore;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    expires_at: Option<Instant>,
}

/// Single-threaded LRU engine.
///
/// A capacity of zero retains nothing; [`CacheBuilder`](crate::builder::CacheBuilder)
/// refuses to build one.
///
/// ```
/// use std::time::{Duration, Instant};
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CacheCore;
///
/// let now = Instant::now();
/// let mut cache = LruCore::new(2);
/// cache.set("a", 1, Duration::ZERO, now);
/// cache.set("b", 2, Duration::ZERO, now);
/// cache.get(&"a", now);
/// cache.set("c", 3, Duration::ZERO, now);
///
/// assert!(!cache.contains(&"b", now));
/// assert_eq!(cache.keys().collect::<Vec<_>>(), [&"c", &"a"]);
/// ```
#[derive(Debug)]
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    order: OrderList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderList::with_capacity(capacity),
            capacity,
        }
    }

    /// The entry that the next capacity eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Resident keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter().map(|entry| &entry.key)
    }

    fn evict_lru(&mut self) {
        if let Some(victim) = self.order.pop_back() {
            self.index.remove(&victim.key);
            trace!(capacity = self.capacity, "lru evicted least recently used entry");
        }
    }

    fn drop_entry(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => self.order.remove(id).is_some(),
            None => false,
        }
    }
}

impl<K, V> CacheCore<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let expires_at = deadline_after(now, ttl);

        if let Some(&id) = self.index.get(&key) {
            // An expired resident is replaced in place: dropping it and
            // re-inserting at the front ends in the same state.
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.order.move_to_front(id);
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }
        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
            expires_at,
        });
        self.index.insert(key, id);
    }

    fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        let id = *self.index.get(key)?;
        let expired = self
            .order
            .get(id)
            .is_some_and(|entry| is_expired(entry.expires_at, now));
        if expired {
            self.drop_entry(key);
            trace!("lru dropped expired entry");
            return None;
        }
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    fn delete(&mut self, key: &K) -> bool {
        self.drop_entry(key)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    fn contains(&self, key: &K, now: Instant) -> bool {
        self.index
            .get(key)
            .and_then(|&id| self.order.get(id))
            .is_some_and(|entry| !is_expired(entry.expires_at, now))
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_links()?;
        ensure_invariant!(
            self.index.len() == self.order.len(),
            "index holds {} keys but recency list holds {}",
            self.index.len(),
            self.order.len()
        );
        ensure_invariant!(
            self.index.len() <= self.capacity,
            "len {} exceeds capacity {}",
            self.index.len(),
            self.capacity
        );
        for (key, &id) in &self.index {
            ensure_invariant!(
                self.order.get(id).is_some_and(|entry| entry.key == *key),
                "index entry points at a node for another key"
            );
        }
        Ok(())
    }
}
