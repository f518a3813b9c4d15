//! # Least Frequently Used (LFU) Engine
//!
//! Bounded cache that evicts an entry with the smallest access count.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LfuCore<K, V>                            │
//!   │                                                                  │
//!   │   items: FxHashMap<K, Item<V>>                                   │
//!   │   ┌─────────┬──────────────────────────────────────┐             │
//!   │   │  page_1 │ value, frequency 3, expires_at       │             │
//!   │   │  page_2 │ value, frequency 1, expires_at       │             │
//!   │   │  page_3 │ value, frequency 1, expires_at       │             │
//!   │   └─────────┴──────────────────────────────────────┘             │
//!   │                                                                  │
//!   │   buckets: FrequencyBuckets<K>                                   │
//!   │   min_freq ─► [1: {page_2, page_3}] ◄──► [3: {page_1}]           │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency Lifecycle
//!
//! ```text
//!   set(new)   → frequency 1, min_freq = 1
//!   get(hit)   → frequency + 1, bucket moves one step up the chain
//!   set(hit)   → value replaced, frequency + 1
//!   expiry     → entry dropped; a later set starts again at 1
//!   eviction   → one member of the min_freq bucket
//! ```
//!
//! ## Tie-breaking
//!
//! When several entries share the minimum frequency the victim is whichever
//! member the bucket's hash set yields first. That choice is repeatable for a
//! given history in one process but carries no recency meaning.

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::FrequencyBuckets;
use crate::error::{InvariantError, ensure_invariant};
use crate::expiry::{deadline_after, is_expired};
use crate::traits::CacheCore;

#[derive(Debug)]
struct Item<V> {
    value: V,
    frequency: u64,
    expires_at: Option<Instant>,
}

/// Single-threaded LFU engine with O(1) eviction.
///
/// ```
/// use std::time::{Duration, Instant};
/// use evictkit::policy::lfu::LfuCore;
/// use evictkit::traits::CacheCore;
///
/// let now = Instant::now();
/// let mut cache = LfuCore::new(2);
/// cache.set("hot", 1, Duration::ZERO, now);
/// cache.set("cold", 2, Duration::ZERO, now);
/// cache.get(&"hot", now);
/// cache.set("new", 3, Duration::ZERO, now);
///
/// assert!(cache.contains(&"hot", now));
/// assert!(!cache.contains(&"cold", now));
/// assert_eq!(cache.frequency(&"hot"), Some(2));
/// assert_eq!(cache.min_frequency(), Some(1));
/// ```
#[derive(Debug)]
pub struct LfuCore<K, V> {
    items: FxHashMap<K, Item<V>>,
    buckets: FrequencyBuckets<K>,
    capacity: usize,
}

impl<K, V> LfuCore<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            items: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FrequencyBuckets::new(),
            capacity,
        }
    }

    /// Access count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.items.get(key).map(|item| item.frequency)
    }

    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }

    fn evict_lfu(&mut self) {
        if let Some((victim, frequency)) = self.buckets.pop_min() {
            self.items.remove(&victim);
            trace!(frequency, "lfu evicted least frequently used entry");
        }
    }

    fn drop_entry(&mut self, key: &K) -> bool {
        match self.items.remove(key) {
            Some(item) => {
                self.buckets.remove(key, item.frequency);
                true
            },
            None => false,
        }
    }
}

impl<K, V> CacheCore<K, V> for LfuCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let expires_at = deadline_after(now, ttl);

        match self.items.get(&key).map(|item| is_expired(item.expires_at, now)) {
            Some(false) => {
                if let Some(item) = self.items.get_mut(&key) {
                    item.value = value;
                    item.expires_at = expires_at;
                    item.frequency = self.buckets.increment(&key, item.frequency);
                }
                return;
            },
            Some(true) => {
                self.drop_entry(&key);
                trace!("lfu dropped expired entry on overwrite");
            },
            None => {},
        }

        if self.items.len() >= self.capacity {
            self.evict_lfu();
        }
        let frequency = self.buckets.increment(&key, 0);
        self.items.insert(
            key,
            Item {
                value,
                frequency,
                expires_at,
            },
        );
    }

    fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        if is_expired(self.items.get(key)?.expires_at, now) {
            self.drop_entry(key);
            trace!("lfu dropped expired entry");
            return None;
        }
        let item = self.items.get_mut(key)?;
        item.frequency = self.buckets.increment(key, item.frequency);
        Some(&item.value)
    }

    fn delete(&mut self, key: &K) -> bool {
        self.drop_entry(key)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.buckets.clear();
    }

    fn contains(&self, key: &K, now: Instant) -> bool {
        self.items
            .get(key)
            .is_some_and(|item| !is_expired(item.expires_at, now))
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;
        ensure_invariant!(
            self.items.len() == self.buckets.len(),
            "{} items but {} bucket members",
            self.items.len(),
            self.buckets.len()
        );
        ensure_invariant!(
            self.items.len() <= self.capacity,
            "len {} exceeds capacity {}",
            self.items.len(),
            self.capacity
        );
        for (key, item) in &self.items {
            ensure_invariant!(
                self.buckets.contains(key, item.frequency),
                "item with frequency {} missing from its bucket",
                item.frequency
            );
        }
        let lowest = self.items.values().map(|item| item.frequency).min();
        ensure_invariant!(
            lowest == self.buckets.min_freq(),
            "min_freq {:?} but lowest item frequency is {:?}",
            self.buckets.min_freq(),
            lowest
        );
        Ok(())
    }
}
