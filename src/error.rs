//! Error types for evictkit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned by [`CacheBuilder::build`](crate::builder::CacheBuilder::build)
//!   and [`CachePolicy::from_str`](crate::builder::CachePolicy) when the policy name
//!   is unknown or the capacity is unusable for a bounded policy.
//! - [`InvariantError`]: Returned by `check_invariants` on the engines when the
//!   index, ordering lists, buckets or ghost lists disagree with each other.
//!
//! Cache operations themselves never fail: misses and expirations are reported
//! through `Option`/`bool`, not through these types.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::error::ConfigError;
//!
//! let err: ConfigError = "mru".parse::<CachePolicy>().unwrap_err();
//! assert!(err.message().contains("mru"));
//!
//! let err = CacheBuilder::new(0).build::<String, u32>(CachePolicy::Lru).unwrap_err();
//! assert!(err.to_string().contains("capacity"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a cache cannot be constructed from the given settings.
///
/// Fatal to the construction attempt only; nothing else in the crate returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The policy identifier did not match any known eviction policy.
    pub fn unknown_policy(name: &str) -> Self {
        Self(format!("unknown cache policy: {name:?}"))
    }

    /// A bounded policy was requested with a capacity of zero.
    pub fn zero_capacity(policy: &str) -> Self {
        Self(format!("{policy} cache capacity must be greater than 0"))
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when an engine's internal structures are inconsistent.
///
/// Carries a description of the first invariant found to be broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

/// Returns `Err(InvariantError)` built from the format arguments when `cond` is false.
macro_rules! ensure_invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::InvariantError::new(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_invariant;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
