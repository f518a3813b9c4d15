//! # Cache Contracts
//!
//! Every engine in this crate implements the same capability set
//! `{set, get, delete, clear}`. The contract is split in two layers:
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │          ConcurrentCache<K, V>               │   &self, Send + Sync
//!   │                                              │   values handed out as Arc<V>
//!   │  set(K, V, ttl)      get(&K) → Option<Arc>   │   clock sampled per call
//!   │  delete(&K) → bool   clear()                 │
//!   └──────────────────────┬───────────────────────┘
//!                          │ Synchronized<C>: one RwLock per instance
//!                          ▼
//!   ┌──────────────────────────────────────────────┐
//!   │            CacheCore<K, V>                   │   &mut self, single-threaded
//!   │                                              │   `now` passed explicitly
//!   │  set(K, V, ttl, now)  get(&K, now) → &V      │
//!   │  delete(&K) → bool    clear()                │
//!   │  contains / len / capacity / check_invariants│
//!   └──────────────────────────────────────────────┘
//!        ▲            ▲            ▲            ▲
//!   SimpleStore    LruCore      LfuCore      ArcCore
//! ```
//!
//! ## Contract Summary
//!
//! | Operation | Miss / absent      | Hit                                   | Fails? |
//! |-----------|--------------------|---------------------------------------|--------|
//! | `set`     | inserts, may evict | overwrites value + deadline           | never  |
//! | `get`     | `None`             | `Some`, updates recency/frequency     | never  |
//! | `delete`  | `false`, no-op     | `true`, entry removed                 | never  |
//! | `clear`   | -                  | drops all entries and adaptive state  | never  |
//!
//! Expired entries are removed lazily when `get` or `set` observes them; there
//! is no background sweeper.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use evictkit::policy::lru::LruCore;
//! use evictkit::traits::CacheCore;
//!
//! fn warm<C: CacheCore<u64, String>>(cache: &mut C, now: Instant) {
//!     for i in 0..4 {
//!         cache.set(i, format!("v{i}"), Duration::ZERO, now);
//!     }
//! }
//!
//! let now = Instant::now();
//! let mut cache = LruCore::new(3);
//! warm(&mut cache, now);
//! assert_eq!(cache.len(), 3);
//! assert!(cache.get(&0, now).is_none());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::InvariantError;

/// Single-threaded eviction engine.
///
/// Implementations own their entries outright and never clone or inspect
/// values. `now` is supplied by the caller so that expiration is decided with
/// the same instant that drives any eviction in the same call.
pub trait CacheCore<K, V> {
    /// Inserts or overwrites `key`. `ttl == Duration::ZERO` means the entry
    /// never expires. May evict one entry to stay within capacity.
    fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant);

    /// Returns the live value for `key`, updating the policy's recency or
    /// frequency state on a hit. An expired entry is removed and reported as
    /// a miss.
    fn get(&mut self, key: &K, now: Instant) -> Option<&V>;

    /// Removes `key` if it is resident; returns whether anything was removed.
    fn delete(&mut self, key: &K) -> bool;

    /// Drops every entry and resets adaptive state.
    fn clear(&mut self);

    /// Returns `true` if `key` holds a live value at `now`.
    ///
    /// Read-only: no recency/frequency update and no lazy removal.
    fn contains(&self, key: &K, now: Instant) -> bool;

    /// Number of resident entries, including ones that have expired but have
    /// not been observed yet.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries, or `None` for unbounded stores.
    fn capacity(&self) -> Option<usize>;

    /// Re-validates every structural invariant of the engine.
    fn check_invariants(&self) -> Result<(), InvariantError>;
}

/// Thread-safe cache handle.
///
/// Every call runs under the instance's lock for its full duration, so the
/// expiration check, the policy update and any eviction it triggers are one
/// atomic step with respect to other callers.
pub trait ConcurrentCache<K, V>: Send + Sync {
    fn set(&self, key: K, value: V, ttl: Duration);

    fn get(&self, key: &K) -> Option<Arc<V>>;

    fn delete(&self, key: &K) -> bool;

    fn clear(&self);

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
