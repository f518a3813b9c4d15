//! Bounded recency list of evicted keys.
//!
//! ARC remembers keys it recently pushed out of T1 (into B1) and T2 (into B2)
//! without keeping their values. A later request for a remembered key tells
//! the cache which side of its partition was too small.
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        keys: OrderList<K>
//!   ┌─────────┬─────────┐              front ─► [C] ◄──► [B] ◄──► [A] ◄── back
//!   │  key A  │  id_1   │                 newest                  oldest (trimmed first)
//!   │  key B  │  id_2   │
//!   └─────────┴─────────┘
//! ```
//!
//! `record`, `remove` and `contains` are O(1) average.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::order_list::OrderList;
use crate::ds::slot_arena::SlotId;
use crate::error::{InvariantError, ensure_invariant};

/// Keys only, newest at the front, at most `capacity` of them.
#[derive(Debug)]
pub struct GhostList<K> {
    keys: OrderList<K>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: OrderList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Pushes `key` to the front, dropping the oldest key on overflow.
    ///
    /// Re-recording a remembered key just refreshes it.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.keys.move_to_front(id);
            return;
        }
        let id = self.keys.push_front(key.clone());
        self.index.insert(key, id);
        if self.keys.len() > self.capacity {
            if let Some(oldest) = self.keys.pop_back() {
                self.index.remove(&oldest);
            }
        }
    }

    /// Forgets `key`; returns `true` if it was remembered.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.keys.remove(id);
                true
            },
            None => false,
        }
    }

    /// Remembered keys, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.index.clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.keys.check_links()?;
        ensure_invariant!(
            self.keys.len() == self.index.len(),
            "ghost list holds {} keys but index has {}",
            self.keys.len(),
            self.index.len()
        );
        ensure_invariant!(
            self.keys.len() <= self.capacity,
            "ghost list length {} exceeds capacity {}",
            self.keys.len(),
            self.capacity
        );
        for (key, &id) in &self.index {
            ensure_invariant!(
                self.keys.get(id) == Some(key),
                "ghost index points at the wrong node"
            );
        }
        Ok(())
    }
}
