//! Adaptive Replacement Cache (ARC) engine.
//!
//! Balances recency against frequency by splitting residents into two lists
//! and remembering recently evicted keys in two ghost lists. A request for a
//! remembered key moves the target partition `p` toward the side that lost it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                            ArcCore<K, V>                                 │
//! │                                                                          │
//! │   index: FxHashMap<K, Location { list: T1 | T2, id: SlotId }>            │
//! │                                                                          │
//! │   T1 (seen once recently)             T2 (seen at least twice)           │
//! │   ┌─────────────────────────┐         ┌─────────────────────────┐        │
//! │   │ MRU               LRU   │         │ MRU               LRU   │        │
//! │   │ [c] ◄──► [b] ◄──► [a]   │         │ [x] ◄──► [y] ◄──► [z]   │        │
//! │   └────────────────────┬────┘         └────────────────────┬────┘        │
//! │                        │ replace                           │ replace     │
//! │                        ▼                                   ▼             │
//! │   B1 (ghosts of T1)                   B2 (ghosts of T2)                  │
//! │   ┌─────────────────────────┐         ┌─────────────────────────┐        │
//! │   │ keys only, ≤ capacity   │         │ keys only, ≤ capacity   │        │
//! │   └─────────────────────────┘         └─────────────────────────┘        │
//! │                                                                          │
//! │   p: target size of T1, 0 ≤ p ≤ capacity                                 │
//! │   • ghost hit in B1 → p += max(|B2| / |B1|, 1)                           │
//! │   • ghost hit in B2 → p -= max(|B1| / |B2|, 1)                           │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Request Flow
//!
//! ```text
//!   get(key):
//!     resident, expired      → move to ghost list, miss
//!     resident, placeholder  → miss
//!     resident in T1         → promote to T2 front, hit
//!     resident in T2         → move to T2 front, hit
//!     in B1 / B2             → adapt p, replace if full, placeholder at T2 front, miss
//!     unknown                → miss
//!
//!   set(key, value):
//!     resident (live)        → overwrite, promote as for a hit
//!     in B1 / B2             → adapt p, replace if full, insert at T2 front
//!     unknown                → replace if full, insert at T1 front
//!
//!   replace(key_in_b2):
//!     if |T1| > 0 and (|T1| > p or (key_in_b2 and |T1| == p)):
//!       T1 tail → B1 front
//!     else:
//!       T2 tail → B2 front        (falls back to T1 when T2 is empty)
//! ```
//!
//! ## Placeholders
//!
//! A ghost hit observed by `get` has no value to install. The key still takes
//! a T2 slot, holding `None`, so that the adaptation and eviction it caused are
//! not lost. A placeholder is never returned by `get`, is invisible to
//! `contains`, counts toward `len`, and is filled in place by the next `set`.
//!
//! ## Operations
//!
//! | Operation | Time   | Notes                                      |
//! |-----------|--------|--------------------------------------------|
//! | `get`     | O(1)   | May promote T1→T2 or adapt via ghost hit   |
//! | `set`     | O(1)   | At most one eviction                       |
//! | `delete`  | O(1)   | Resident key moves to its ghost list       |
//! | `clear`   | O(n)   | Also resets `p` to 0                       |
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{GhostList, OrderList, SlotId};
use crate::error::{InvariantError, ensure_invariant};
use crate::expiry::{deadline_after, is_expired};
use crate::traits::CacheCore;

/// Which resident list an entry is in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ListKind {
    T1,
    T2,
}

#[derive(Copy, Clone, Debug)]
struct Location {
    list: ListKind,
    id: SlotId,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    /// `None` marks a placeholder left by a ghost hit on `get`.
    value: Option<V>,
    expires_at: Option<Instant>,
}

/// Single-threaded ARC engine.
///
/// ```
/// use std::time::{Duration, Instant};
/// use evictkit::policy::arc::ArcCore;
/// use evictkit::traits::CacheCore;
///
/// let now = Instant::now();
/// let mut cache = ArcCore::new(2);
/// cache.set("a", 1, Duration::ZERO, now);
/// cache.set("b", 2, Duration::ZERO, now);
/// assert_eq!(cache.t1_len(), 2);
///
/// // A second access promotes to the frequency side.
/// cache.get(&"a", now);
/// assert_eq!((cache.t1_len(), cache.t2_len()), (1, 1));
///
/// // "b" is pushed out of T1 and remembered in B1.
/// cache.set("c", 3, Duration::ZERO, now);
/// assert_eq!(cache.b1_len(), 1);
///
/// // Bringing "b" back is a B1 ghost hit: p grows toward recency.
/// cache.set("b", 4, Duration::ZERO, now);
/// assert_eq!(cache.p_value(), 1);
/// ```
pub struct ArcCore<K, V> {
    index: FxHashMap<K, Location>,
    t1: OrderList<Entry<K, V>>,
    t2: OrderList<Entry<K, V>>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    p: usize,
    capacity: usize,
}

impl<K, V> ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an engine holding at most `capacity` residents; each ghost
    /// list remembers at most `capacity` keys. `p` starts at 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            t1: OrderList::with_capacity(capacity),
            t2: OrderList::with_capacity(capacity),
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity),
            p: 0,
            capacity,
        }
    }

    /// Current target size of T1.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Returns `true` if `key` occupies a T2 slot without a value.
    pub fn is_placeholder(&self, key: &K) -> bool {
        self.entry(key).is_some_and(|entry| entry.value.is_none())
    }

    fn list(&self, kind: ListKind) -> &OrderList<Entry<K, V>> {
        match kind {
            ListKind::T1 => &self.t1,
            ListKind::T2 => &self.t2,
        }
    }

    fn entry(&self, key: &K) -> Option<&Entry<K, V>> {
        let loc = self.index.get(key)?;
        self.list(loc.list).get(loc.id)
    }

    fn resident_len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Moves a resident hit to the T2 front and returns its new handle.
    fn promote(&mut self, key: &K, loc: Location) -> Option<SlotId> {
        match loc.list {
            ListKind::T2 => {
                self.t2.move_to_front(loc.id);
                Some(loc.id)
            },
            ListKind::T1 => {
                let entry = self.t1.remove(loc.id)?;
                let id = self.t2.push_front(entry);
                if let Some(slot) = self.index.get_mut(key) {
                    *slot = Location {
                        list: ListKind::T2,
                        id,
                    };
                }
                Some(id)
            },
        }
    }

    /// Takes a resident out of T1/T2 and remembers it in the matching ghost list.
    fn retire(&mut self, key: &K) -> Option<Entry<K, V>> {
        let loc = self.index.remove(key)?;
        match loc.list {
            ListKind::T1 => {
                let entry = self.t1.remove(loc.id);
                self.b1.record(key.clone());
                entry
            },
            ListKind::T2 => {
                let entry = self.t2.remove(loc.id);
                self.b2.record(key.clone());
                entry
            },
        }
    }

    fn adapt(&mut self, ghost: ListKind) {
        match ghost {
            ListKind::T1 => {
                let delta = (self.b2.len() / self.b1.len().max(1)).max(1);
                self.p = (self.p + delta).min(self.capacity);
                debug!(p = self.p, delta, "arc ghost hit in B1, favouring recency");
            },
            ListKind::T2 => {
                let delta = (self.b1.len() / self.b2.len().max(1)).max(1);
                self.p = self.p.saturating_sub(delta);
                debug!(p = self.p, delta, "arc ghost hit in B2, favouring frequency");
            },
        }
    }

    /// Frees one resident slot by demoting a T1 or T2 tail into its ghost list.
    fn replace(&mut self, key_in_b2: bool) {
        let t1_len = self.t1.len();
        let prefer_t1 = t1_len > 0 && (t1_len > self.p || (key_in_b2 && t1_len == self.p));
        let from_t1 = prefer_t1 || self.t2.is_empty();

        if from_t1 {
            if let Some(victim) = self.t1.pop_back() {
                self.index.remove(&victim.key);
                self.b1.record(victim.key);
                trace!(p = self.p, "arc demoted T1 tail to B1");
            }
        } else if let Some(victim) = self.t2.pop_back() {
            self.index.remove(&victim.key);
            self.b2.record(victim.key);
            trace!(p = self.p, "arc demoted T2 tail to B2");
        }
    }

    /// Handles a miss on `key`: on a ghost hit adapts `p`, forgets the ghost
    /// and makes room. Returns `true` when the key should enter T2.
    fn request(&mut self, key: &K) -> bool {
        let ghost = if self.b1.contains(key) {
            ListKind::T1
        } else if self.b2.contains(key) {
            ListKind::T2
        } else {
            return false;
        };

        self.adapt(ghost);
        match ghost {
            ListKind::T1 => self.b1.remove(key),
            ListKind::T2 => self.b2.remove(key),
        };
        if self.resident_len() >= self.capacity {
            self.replace(ghost == ListKind::T2);
        }
        true
    }

    fn install(&mut self, key: K, value: Option<V>, expires_at: Option<Instant>, list: ListKind) {
        let entry = Entry {
            key: key.clone(),
            value,
            expires_at,
        };
        let id = match list {
            ListKind::T1 => self.t1.push_front(entry),
            ListKind::T2 => self.t2.push_front(entry),
        };
        self.index.insert(key, Location { list, id });
    }
}

impl<K, V> fmt::Debug for ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCore")
            .field("capacity", &self.capacity)
            .field("p", &self.p)
            .field("t1_len", &self.t1.len())
            .field("t2_len", &self.t2.len())
            .field("b1_len", &self.b1.len())
            .field("b2_len", &self.b2.len())
            .finish()
    }
}

impl<K, V> CacheCore<K, V> for ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let expires_at = deadline_after(now, ttl);

        if let Some(&loc) = self.index.get(&key) {
            let expired = self
                .list(loc.list)
                .get(loc.id)
                .is_some_and(|entry| is_expired(entry.expires_at, now));
            if expired {
                self.retire(&key);
                trace!("arc retired expired entry on overwrite");
            } else {
                if let Some(id) = self.promote(&key, loc) {
                    if let Some(entry) = self.t2.get_mut(id) {
                        entry.value = Some(value);
                        entry.expires_at = expires_at;
                    }
                }
                return;
            }
        }

        if self.request(&key) {
            self.install(key, Some(value), expires_at, ListKind::T2);
            return;
        }
        if self.resident_len() >= self.capacity {
            self.replace(false);
        }
        self.install(key, Some(value), expires_at, ListKind::T1);
    }

    fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        let Some(&loc) = self.index.get(key) else {
            if self.request(key) {
                self.install(key.clone(), None, None, ListKind::T2);
            }
            return None;
        };

        let entry = self.list(loc.list).get(loc.id)?;
        if is_expired(entry.expires_at, now) {
            self.retire(key);
            trace!("arc retired expired entry");
            return None;
        }
        if entry.value.is_none() {
            return None;
        }
        let id = self.promote(key, loc)?;
        self.t2.get(id).and_then(|entry| entry.value.as_ref())
    }

    fn delete(&mut self, key: &K) -> bool {
        self.retire(key).is_some_and(|entry| entry.value.is_some())
    }

    fn clear(&mut self) {
        self.index.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }

    fn contains(&self, key: &K, now: Instant) -> bool {
        self.entry(key)
            .is_some_and(|entry| entry.value.is_some() && !is_expired(entry.expires_at, now))
    }

    fn len(&self) -> usize {
        self.resident_len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.t1.check_links()?;
        self.t2.check_links()?;
        self.b1.check_invariants()?;
        self.b2.check_invariants()?;

        ensure_invariant!(
            self.index.len() == self.resident_len(),
            "index holds {} keys but T1 + T2 hold {}",
            self.index.len(),
            self.resident_len()
        );
        ensure_invariant!(
            self.resident_len() <= self.capacity,
            "|T1| + |T2| = {} exceeds capacity {}",
            self.resident_len(),
            self.capacity
        );
        ensure_invariant!(
            self.p <= self.capacity,
            "p = {} exceeds capacity {}",
            self.p,
            self.capacity
        );
        for (key, loc) in &self.index {
            let entry = self.list(loc.list).get(loc.id);
            ensure_invariant!(
                entry.is_some_and(|entry| entry.key == *key),
                "index entry for {:?} points at a node for another key",
                loc.list
            );
            ensure_invariant!(
                loc.list == ListKind::T2 || entry.is_some_and(|entry| entry.value.is_some()),
                "placeholder found in T1"
            );
            ensure_invariant!(
                !self.b1.contains(key) && !self.b2.contains(key),
                "resident key also present in a ghost list"
            );
        }
        for key in self.b1.iter() {
            ensure_invariant!(!self.b2.contains(key), "key present in both B1 and B2");
        }
        Ok(())
    }
}
