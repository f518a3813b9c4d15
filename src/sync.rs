//! Thread-safe wrapper around a single-threaded engine.
//!
//! ```text
//!   Synchronized<C>  (Clone = another handle to the same cache)
//!   ┌────────────────────────────────────────────┐
//!   │  inner: Arc<RwLock<C>>                     │
//!   │  clock: Arc<dyn Clock>                     │
//!   └────────────────────────────────────────────┘
//!
//!   get / set / delete / clear → write lock, clock sampled under the lock
//!   contains / len             → read lock
//! ```
//!
//! Every hit mutates recency or frequency state, so `get` takes the write
//! lock. The expiration check, the policy update and any eviction happen in
//! one critical section.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::expiry::{Clock, SystemClock};
use crate::traits::{CacheCore, ConcurrentCache};

/// Shares one engine between threads. Values are stored as `Arc<V>` and
/// handed out by cloning the `Arc`.
///
/// ```
/// use std::time::Duration;
/// use evictkit::policy::lru::LruCore;
/// use evictkit::sync::Synchronized;
/// use evictkit::traits::ConcurrentCache;
///
/// let cache = Synchronized::new(LruCore::new(2));
/// let handle = cache.clone();
/// std::thread::spawn(move || handle.set("a", 1, Duration::ZERO))
///     .join()
///     .unwrap();
/// assert_eq!(cache.get(&"a").as_deref(), Some(&1));
/// ```
pub struct Synchronized<C> {
    inner: Arc<RwLock<C>>,
    clock: Arc<dyn Clock>,
}

impl<C> Synchronized<C> {
    /// Wraps `core`, reading time from the system clock.
    pub fn new(core: C) -> Self {
        Self::with_clock(core, Arc::new(SystemClock))
    }

    pub fn with_clock(core: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
            clock,
        }
    }

    /// Runs `f` against the engine under the read lock.
    ///
    /// Used for introspection (`check_invariants`, ARC's `p_value`, ...).
    pub fn with_core<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<C> Clone for Synchronized<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for Synchronized<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronized")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<K, V, C> ConcurrentCache<K, V> for Synchronized<C>
where
    C: CacheCore<K, Arc<V>> + Send + Sync,
{
    fn set(&self, key: K, value: V, ttl: Duration) {
        let value = Arc::new(value);
        let mut core = self.inner.write();
        let now = self.clock.now();
        core.set(key, value, ttl, now);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut core = self.inner.write();
        let now = self.clock.now();
        core.get(key, now).cloned()
    }

    fn delete(&self, key: &K) -> bool {
        self.inner.write().delete(key)
    }

    fn clear(&self) {
        self.inner.write().clear();
    }

    fn contains(&self, key: &K) -> bool {
        let core = self.inner.read();
        core.contains(key, self.clock.now())
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }
}
