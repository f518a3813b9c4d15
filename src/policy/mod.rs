//! Eviction engines.
//!
//! | Engine | Bound | Victim | Extra state |
//! |--------|-------|--------|-------------|
//! | [`SimpleStore`](simple::SimpleStore) | none | - | - |
//! | [`LruCore`](lru::LruCore) | `capacity` | least recently used | recency list |
//! | [`LfuCore`](lfu::LfuCore) | `capacity` | lowest access count | frequency buckets |
//! | [`ArcCore`](arc::ArcCore) | `capacity` | T1 or T2 tail, steered by `p` | T1, T2, B1, B2 |
//!
//! All of them implement [`CacheCore`](crate::traits::CacheCore) and are
//! single-threaded; wrap one in [`Synchronized`](crate::sync::Synchronized)
//! to share it.

pub mod arc;
pub mod lfu;
pub mod lru;
pub mod simple;
