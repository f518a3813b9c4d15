//! Frequency buckets for O(1) LFU bookkeeping.
//!
//! Keys are grouped by access count. Buckets form a doubly linked chain in
//! ascending frequency order and `min_freq` names the head of the chain, so
//! finding an eviction victim never scans or sorts.
//!
//! ## Architecture
//!
//! ```text
//!   buckets: FxHashMap<u64, Bucket<K>>
//!
//!   min_freq = 1
//!       │
//!       ▼
//!   ┌─────────────┐  next  ┌─────────────┐  next  ┌─────────────┐
//!   │ freq 1      │ ─────► │ freq 2      │ ─────► │ freq 5      │
//!   │ {b, c}      │ ◄───── │ {a}         │ ◄───── │ {d}         │
//!   └─────────────┘  prev  └─────────────┘  prev  └─────────────┘
//! ```
//!
//! Empty buckets are unlinked and dropped immediately, so the chain only ever
//! holds frequencies that some key currently has.
//!
//! ## Increment Flow
//!
//! ```text
//!   increment(a, 2):
//!     1. take a out of bucket 2; bucket 2 empty → unlink it (1 ◄──► 5)
//!     2. bucket 3 missing → create it where bucket 2 was (1 ◄──► 3 ◄──► 5)
//!     3. put a into bucket 3
//!     4. min_freq unchanged (bucket 1 still populated)
//! ```
//!
//! ## Tie-breaking
//!
//! Members of a bucket are an unordered set. [`FrequencyBuckets::pop_min`]
//! returns whichever member the set yields first: stable for a given history
//! within one process, but not an LRU or FIFO guarantee.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{InvariantError, ensure_invariant};

#[derive(Debug)]
struct Bucket<K> {
    members: FxHashSet<K>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Frequency → key-set chain with an O(1) minimum.
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    buckets: FxHashMap<u64, Bucket<K>>,
    min_freq: u64,
    len: usize,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            buckets: FxHashMap::default(),
            min_freq: 0,
            len: 0,
        }
    }

    /// Number of keys tracked across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of linked (non-empty) buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Smallest frequency held by any key, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Returns `true` if `key` sits in the bucket for `freq`.
    pub fn contains(&self, key: &K, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .is_some_and(|bucket| bucket.members.contains(key))
    }

    /// Moves `key` from bucket `freq` to bucket `freq + 1` and returns the new
    /// frequency. `freq == 0` attaches a key that is not tracked yet.
    pub fn increment(&mut self, key: &K, freq: u64) -> u64 {
        let next_freq = freq.saturating_add(1);
        if freq == 0 {
            self.link_member(key.clone(), next_freq, None);
            return next_freq;
        }
        if next_freq == freq {
            return freq;
        }
        let after = match self.unlink_member(key, freq) {
            Some(Unlinked { emptied: false, .. }) => Some(freq),
            Some(Unlinked { prev, .. }) => prev,
            // Untracked key: treat as a fresh attach at the right spot.
            None => self.floor_bucket(freq),
        };
        self.link_member(key.clone(), next_freq, after);
        next_freq
    }

    /// Stops tracking `key` at `freq`; returns `false` if it was not there.
    pub fn remove(&mut self, key: &K, freq: u64) -> bool {
        self.unlink_member(key, freq).is_some()
    }

    /// Removes one key from the lowest-frequency bucket.
    ///
    /// Which member is chosen among equals is unspecified.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let freq = self.min_freq()?;
        let key = self.buckets.get(&freq)?.members.iter().next().cloned()?;
        self.unlink_member(&key, freq)?;
        Some((key, freq))
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.min_freq = 0;
        self.len = 0;
    }

    /// Highest linked bucket strictly below `freq`.
    fn floor_bucket(&self, freq: u64) -> Option<u64> {
        let mut found = None;
        let mut cursor = self.min_freq();
        while let Some(f) = cursor {
            if f >= freq {
                break;
            }
            found = Some(f);
            cursor = self.buckets.get(&f).and_then(|b| b.next);
        }
        found
    }

    fn unlink_member(&mut self, key: &K, freq: u64) -> Option<Unlinked> {
        let bucket = self.buckets.get_mut(&freq)?;
        if !bucket.members.remove(key) {
            return None;
        }
        self.len -= 1;
        let (prev, next) = (bucket.prev, bucket.next);
        if !bucket.members.is_empty() {
            return Some(Unlinked {
                prev,
                emptied: false,
            });
        }

        self.buckets.remove(&freq);
        match prev.and_then(|p| self.buckets.get_mut(&p)) {
            Some(p) => p.next = next,
            None => self.min_freq = next.unwrap_or(0),
        }
        if let Some(n) = next.and_then(|n| self.buckets.get_mut(&n)) {
            n.prev = prev;
        }
        Some(Unlinked {
            prev,
            emptied: true,
        })
    }

    /// Adds `key` to bucket `freq`, creating and linking the bucket right
    /// after `after` (or at the head) when it does not exist yet.
    fn link_member(&mut self, key: K, freq: u64, after: Option<u64>) {
        self.len += 1;
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            bucket.members.insert(key);
            return;
        }

        let next = match after {
            Some(a) => self.buckets.get(&a).and_then(|b| b.next),
            None => self.min_freq(),
        };
        let mut members = FxHashSet::default();
        members.insert(key);
        self.buckets.insert(
            freq,
            Bucket {
                members,
                prev: after,
                next,
            },
        );
        match after.and_then(|a| self.buckets.get_mut(&a)) {
            Some(p) => p.next = Some(freq),
            None => self.min_freq = freq,
        }
        if let Some(n) = next.and_then(|n| self.buckets.get_mut(&n)) {
            n.prev = Some(freq);
        }
    }

    /// Walks the chain checking order, back-links, emptiness and counts.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen_buckets = 0usize;
        let mut seen_keys = 0usize;
        let mut prev: Option<u64> = None;
        let mut cursor = self.min_freq();
        while let Some(freq) = cursor {
            let Some(bucket) = self.buckets.get(&freq) else {
                return Err(InvariantError::new(format!(
                    "bucket chain links to missing frequency {freq}"
                )));
            };
            ensure_invariant!(
                bucket.prev == prev,
                "bucket {} has prev {:?}, expected {:?}",
                freq,
                bucket.prev,
                prev
            );
            if let Some(p) = prev {
                ensure_invariant!(p < freq, "bucket chain out of order: {} before {}", p, freq);
            }
            ensure_invariant!(!bucket.members.is_empty(), "empty bucket {} still linked", freq);
            seen_buckets += 1;
            seen_keys += bucket.members.len();
            ensure_invariant!(seen_buckets <= self.buckets.len(), "cycle in bucket chain");
            prev = Some(freq);
            cursor = bucket.next;
        }
        ensure_invariant!(
            seen_buckets == self.buckets.len(),
            "{} buckets reachable from min_freq but {} allocated",
            seen_buckets,
            self.buckets.len()
        );
        ensure_invariant!(
            seen_keys == self.len,
            "buckets hold {} keys but len is {}",
            seen_keys,
            self.len
        );
        Ok(())
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

struct Unlinked {
    prev: Option<u64>,
    emptied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_starts_at_one() {
        let mut fb = FrequencyBuckets::new();
        assert_eq!(fb.increment(&"a", 0), 1);
        assert_eq!(fb.increment(&"b", 0), 1);
        assert_eq!(fb.min_freq(), Some(1));
        assert_eq!(fb.bucket_count(), 1);
        assert_eq!(fb.len(), 2);
        fb.check_invariants().unwrap();
    }

    #[test]
    fn emptied_min_bucket_advances_min() {
        let mut fb = FrequencyBuckets::new();
        fb.increment(&"a", 0);
        assert_eq!(fb.increment(&"a", 1), 2);
        assert_eq!(fb.min_freq(), Some(2));
        assert_eq!(fb.bucket_count(), 1);
        fb.check_invariants().unwrap();
    }

    #[test]
    fn new_bucket_takes_place_of_emptied_one() {
        let mut fb = FrequencyBuckets::new();
        for key in ["a", "b", "c"] {
            fb.increment(&key, 0);
        }
        // b → 2, c → 2 → 3 → 4 → 5
        fb.increment(&"b", 1);
        let mut f = fb.increment(&"c", 1);
        for _ in 0..3 {
            f = fb.increment(&"c", f);
        }
        assert_eq!(f, 5);
        // chain: 1{a} 2{b} 5{c}; b → 3 empties bucket 2
        fb.increment(&"b", 2);
        assert!(fb.contains(&"b", 3));
        assert_eq!(fb.bucket_count(), 3);
        fb.check_invariants().unwrap();
    }

    #[test]
    fn pop_min_prefers_lowest_frequency() {
        let mut fb = FrequencyBuckets::new();
        fb.increment(&"hot", 0);
        fb.increment(&"hot", 1);
        fb.increment(&"cold", 0);
        assert_eq!(fb.pop_min(), Some(("cold", 1)));
        assert_eq!(fb.pop_min(), Some(("hot", 2)));
        assert_eq!(fb.pop_min(), None);
        assert_eq!(fb.min_freq(), None);
        fb.check_invariants().unwrap();
    }

    #[test]
    fn remove_middle_bucket_relinks_neighbours() {
        let mut fb = FrequencyBuckets::new();
        fb.increment(&1, 0);
        fb.increment(&2, 0);
        fb.increment(&2, 1);
        fb.increment(&3, 0);
        fb.increment(&3, 1);
        fb.increment(&3, 2);
        assert!(fb.remove(&2, 2));
        assert!(!fb.remove(&2, 2));
        assert_eq!(fb.bucket_count(), 2);
        fb.check_invariants().unwrap();
    }

    #[test]
    fn clear_resets_min() {
        let mut fb = FrequencyBuckets::new();
        fb.increment(&"x", 0);
        fb.clear();
        assert!(fb.is_empty());
        assert_eq!(fb.min_freq(), None);
        fb.check_invariants().unwrap();
    }
}
