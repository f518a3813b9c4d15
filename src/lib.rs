//! evictkit: in-process key-value caches with interchangeable eviction policies.
//!
//! Four engines share one contract: an unbounded [`SimpleStore`](policy::simple::SimpleStore),
//! [`LruCore`](policy::lru::LruCore), [`LfuCore`](policy::lfu::LfuCore) and
//! [`ArcCore`](policy::arc::ArcCore). Every entry may carry a TTL, checked lazily.
//! [`CacheBuilder`](builder::CacheBuilder) picks an engine by name and wraps it for
//! use from many threads.

pub mod builder;
pub mod ds;
pub mod error;
pub mod expiry;
pub mod policy;
pub mod prelude;
pub mod sync;
pub mod traits;
