pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::expiry::{Clock, ManualClock, SystemClock};
pub use crate::policy::arc::ArcCore;
pub use crate::policy::lfu::LfuCore;
pub use crate::policy::lru::LruCore;
pub use crate::policy::simple::SimpleStore;
pub use crate::sync::Synchronized;
pub use crate::traits::{CacheCore, ConcurrentCache};
