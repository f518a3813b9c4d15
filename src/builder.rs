//! Unified cache builder for all eviction policies.
//!
//! Maps a policy name and a capacity to a ready-to-share cache, hiding the
//! `Arc<V>` wrapping and the lock behind one handle type.
//!
//! | Name                 | Policy                  | Capacity |
//! |----------------------|-------------------------|----------|
//! | `memory` / `simple`  | [`CachePolicy::Simple`] | ignored  |
//! | `lru`                | [`CachePolicy::Lru`]    | > 0      |
//! | `lfu`                | [`CachePolicy::Lfu`]    | > 0      |
//! | `arc`                | [`CachePolicy::Arc`]    | > 0      |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::traits::ConcurrentCache;
//!
//! let policy: CachePolicy = "lru".parse().unwrap();
//! let cache = CacheBuilder::new(100).build::<u64, String>(policy).unwrap();
//! cache.set(1, "hello".to_string(), Duration::ZERO);
//! assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("hello"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConfigError, InvariantError};
use crate::expiry::{Clock, SystemClock};
use crate::policy::arc::ArcCore;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::simple::SimpleStore;
use crate::sync::Synchronized;
use crate::traits::{CacheCore, ConcurrentCache};

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Unbounded map, expiration only.
    Simple,
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction (bucket-based).
    Lfu,
    /// Adaptive Replacement Cache.
    Arc,
}

impl CachePolicy {
    pub fn name(self) -> &'static str {
        match self {
            CachePolicy::Simple => "memory",
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
            CachePolicy::Arc => "arc",
        }
    }

    /// `false` only for [`CachePolicy::Simple`].
    pub fn is_bounded(self) -> bool {
        !matches!(self, CachePolicy::Simple)
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "simple" => Ok(CachePolicy::Simple),
            "lru" => Ok(CachePolicy::Lru),
            "lfu" => Ok(CachePolicy::Lfu),
            "arc" => Ok(CachePolicy::Arc),
            _ => Err(ConfigError::unknown_policy(s)),
        }
    }
}

/// Unified cache handle that provides a consistent API regardless of policy.
///
/// Cloning yields another handle to the same cache.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
    policy: CachePolicy,
    capacity: Option<usize>,
}

enum CacheInner<K, V> {
    Simple(Synchronized<SimpleStore<K, Arc<V>>>),
    Lru(Synchronized<LruCore<K, Arc<V>>>),
    Lfu(Synchronized<LfuCore<K, Arc<V>>>),
    Adaptive(Synchronized<ArcCore<K, Arc<V>>>),
}

impl<K, V> Clone for CacheInner<K, V> {
    fn clone(&self) -> Self {
        match self {
            CacheInner::Simple(cache) => CacheInner::Simple(cache.clone()),
            CacheInner::Lru(cache) => CacheInner::Lru(cache.clone()),
            CacheInner::Lfu(cache) => CacheInner::Lfu(cache.clone()),
            CacheInner::Adaptive(cache) => CacheInner::Adaptive(cache.clone()),
        }
    }
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            policy: self.policy,
            capacity: self.capacity,
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Cache<K, V> {
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Maximum resident entries, `None` for [`CachePolicy::Simple`].
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Target T1 size when the policy is ARC.
    pub fn arc_target(&self) -> Option<usize>
    where
        K: Clone + Eq + Hash,
    {
        match &self.inner {
            CacheInner::Adaptive(cache) => Some(cache.with_core(|core| core.p_value())),
            _ => None,
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    /// Re-validates the engine's structural invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            CacheInner::Simple(cache) => cache.with_core(|core| core.check_invariants()),
            CacheInner::Lru(cache) => cache.with_core(|core| core.check_invariants()),
            CacheInner::Lfu(cache) => cache.with_core(|core| core.check_invariants()),
            CacheInner::Adaptive(cache) => cache.with_core(|core| core.check_invariants()),
        }
    }
}

impl<K, V> ConcurrentCache<K, V> for Cache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    fn set(&self, key: K, value: V, ttl: Duration) {
        match &self.inner {
            CacheInner::Simple(cache) => cache.set(key, value, ttl),
            CacheInner::Lru(cache) => cache.set(key, value, ttl),
            CacheInner::Lfu(cache) => cache.set(key, value, ttl),
            CacheInner::Adaptive(cache) => cache.set(key, value, ttl),
        }
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        match &self.inner {
            CacheInner::Simple(cache) => cache.get(key),
            CacheInner::Lru(cache) => cache.get(key),
            CacheInner::Lfu(cache) => cache.get(key),
            CacheInner::Adaptive(cache) => cache.get(key),
        }
    }

    fn delete(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Simple(cache) => ConcurrentCache::<K, V>::delete(cache, key),
            CacheInner::Lru(cache) => ConcurrentCache::<K, V>::delete(cache, key),
            CacheInner::Lfu(cache) => ConcurrentCache::<K, V>::delete(cache, key),
            CacheInner::Adaptive(cache) => ConcurrentCache::<K, V>::delete(cache, key),
        }
    }

    fn clear(&self) {
        match &self.inner {
            CacheInner::Simple(cache) => ConcurrentCache::<K, V>::clear(cache),
            CacheInner::Lru(cache) => ConcurrentCache::<K, V>::clear(cache),
            CacheInner::Lfu(cache) => ConcurrentCache::<K, V>::clear(cache),
            CacheInner::Adaptive(cache) => ConcurrentCache::<K, V>::clear(cache),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Simple(cache) => ConcurrentCache::<K, V>::contains(cache, key),
            CacheInner::Lru(cache) => ConcurrentCache::<K, V>::contains(cache, key),
            CacheInner::Lfu(cache) => ConcurrentCache::<K, V>::contains(cache, key),
            CacheInner::Adaptive(cache) => ConcurrentCache::<K, V>::contains(cache, key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Simple(cache) => ConcurrentCache::<K, V>::len(cache),
            CacheInner::Lru(cache) => ConcurrentCache::<K, V>::len(cache),
            CacheInner::Lfu(cache) => ConcurrentCache::<K, V>::len(cache),
            CacheInner::Adaptive(cache) => ConcurrentCache::<K, V>::len(cache),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Clone)]
pub struct CacheBuilder {
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CacheBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clock: Arc::new(SystemClock),
        }
    }

    /// Time source used for TTL decisions; defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a cache with the specified policy.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if a bounded policy is given a capacity of zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evictkit::builder::{CacheBuilder, CachePolicy};
    ///
    /// let arc = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Arc).unwrap();
    /// assert_eq!(arc.capacity(), Some(100));
    ///
    /// let map = CacheBuilder::new(0).build::<u64, String>(CachePolicy::Simple).unwrap();
    /// assert_eq!(map.capacity(), None);
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
    {
        if policy.is_bounded() && self.capacity == 0 {
            return Err(ConfigError::zero_capacity(policy.name()));
        }
        let capacity = self.capacity;
        let clock = self.clock;
        let inner = match policy {
            CachePolicy::Simple => {
                CacheInner::Simple(Synchronized::with_clock(SimpleStore::new(), clock))
            },
            CachePolicy::Lru => {
                CacheInner::Lru(Synchronized::with_clock(LruCore::new(capacity), clock))
            },
            CachePolicy::Lfu => {
                CacheInner::Lfu(Synchronized::with_clock(LfuCore::new(capacity), clock))
            },
            CachePolicy::Arc => {
                CacheInner::Adaptive(Synchronized::with_clock(ArcCore::new(capacity), clock))
            },
        };
        debug!(policy = policy.name(), capacity, "built cache");
        Ok(Cache {
            inner,
            policy,
            capacity: policy.is_bounded().then_some(capacity),
        })
    }
}
