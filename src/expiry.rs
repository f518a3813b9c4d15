//! Expiration helpers shared by every engine.
//!
//! An entry carries an optional absolute deadline. `None` is the
//! "never expires" sentinel; a deadline is produced from a relative TTL at
//! write time and compared against the caller-supplied `now` on every read.
//!
//! Engines never read the clock themselves. The [`Clock`] trait lives here so
//! that [`Synchronized`](crate::sync::Synchronized) can sample time once per
//! operation, inside its critical section, and tests can drive time with
//! [`ManualClock`] instead of sleeping.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Converts a relative TTL into an absolute deadline.
///
/// `Duration::ZERO` means the entry never expires. A TTL too large to be
/// represented as an `Instant` is treated the same way.
///
/// ```
/// use std::time::{Duration, Instant};
/// use evictkit::expiry::deadline_after;
///
/// let now = Instant::now();
/// assert_eq!(deadline_after(now, Duration::ZERO), None);
/// assert_eq!(deadline_after(now, Duration::from_secs(1)), Some(now + Duration::from_secs(1)));
/// ```
#[inline]
pub fn deadline_after(now: Instant, ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        return None;
    }
    now.checked_add(ttl)
}

/// Returns `true` once `now` has reached the deadline.
#[inline]
pub fn is_expired(expires_at: Option<Instant>, now: Instant) -> bool {
    match expires_at {
        Some(deadline) => now >= deadline,
        None => false,
    }
}

/// Source of the current time for a synchronized cache.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time via `Instant::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// ```
/// use std::time::Duration;
/// use evictkit::expiry::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Starts at the current wall-clock instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &*self.now.lock())
            .finish()
    }
}
