//! Memoization caches for deferred step functions
//!
//! A cache maps a function identity plus a canonical argument key to the
//! value that function produced for those arguments. Every function gets its
//! own table, so equal argument keys of different functions never meet.
//!
//! # Design
//!
//! - Function identity is an explicit [`FnId`] token chosen by the caller
//! - Argument tuples are keyed by [`MemoArgs::memo_key`], which joins the
//!   `Display` form of each element with `"_"`
//! - Cache methods take `&self`; each implementation owns its interior
//!   mutability so one cache can back every node of a walk
//! - The walker records a value only if its key is absent, and consults the
//!   cache before running a step
//!
//! Known limitation: two argument tuples whose joined forms are equal share an
//! entry (e.g. `("a_b", "c")` and `("a", "b_c")`). Numeric arguments never
//! collide this way.
//!
//! Caches only ever see the finished key string. Arguments that need a
//! structural key implement [`MemoArgs`] themselves with an encoding that is
//! injective for their type; see the length-prefixed example on that trait.
//!
//! # Example
//!
//! ```
//! use stackless::memo::{DefaultMemoCache, FnId, MemoArgs, MemoCache};
//!
//! const ACK: FnId = FnId::new("ack");
//!
//! let cache = DefaultMemoCache::new();
//! cache.set(ACK, (2u64, 1u64).memo_key(), 5u64);
//!
//! assert!(cache.has(ACK, "2_1"));
//! assert_eq!(cache.get(ACK, "2_1"), Some(5));
//! ```

mod args;
mod bounded;
mod concurrent;
mod default;

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub use args::{MemoArgs, KEY_SEPARATOR};
pub use bounded::BoundedMemoCache;
pub use concurrent::ConcurrentMemoCache;
pub use default::DefaultMemoCache;

/// Opaque identity of a memoized step function.
///
/// Two step functions must never share an id; the id is the only thing that
/// separates their cache tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnId(&'static str);

impl FnId {
    /// Create an id from a name that is unique among the memoized functions
    pub const fn new(name: &'static str) -> Self {
        FnId(name)
    }

    /// The name this id was created from
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for FnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnId({})", self.0)
    }
}

impl fmt::Display for FnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A memoization table keyed by `(function, argument key)`.
///
/// The argument key arrives already built by [`MemoArgs::memo_key`], so the
/// strength of the key is decided by the argument type, not the cache.
pub trait MemoCache<V> {
    /// Whether a value is recorded for `f` applied to `key`
    fn has(&self, f: FnId, key: &str) -> bool;

    /// The recorded value for `f` applied to `key`, if any
    fn get(&self, f: FnId, key: &str) -> Option<V>;

    /// Record `value` for `f` applied to `key`, replacing any previous value
    fn set(&self, f: FnId, key: String, value: V) -> &Self;

    /// Every `(key, value)` pair recorded for `f`, in no particular order
    fn entries(&self, f: FnId) -> Vec<(String, V)>;

    /// Number of values recorded for `f`
    fn count(&self, f: FnId) -> usize {
        self.entries(f).len()
    }
}

impl<V, C: MemoCache<V> + ?Sized> MemoCache<V> for Rc<C> {
    fn has(&self, f: FnId, key: &str) -> bool {
        (**self).has(f, key)
    }

    fn get(&self, f: FnId, key: &str) -> Option<V> {
        (**self).get(f, key)
    }

    fn set(&self, f: FnId, key: String, value: V) -> &Self {
        (**self).set(f, key, value);
        self
    }

    fn entries(&self, f: FnId) -> Vec<(String, V)> {
        (**self).entries(f)
    }

    fn count(&self, f: FnId) -> usize {
        (**self).count(f)
    }
}

impl<V, C: MemoCache<V> + ?Sized> MemoCache<V> for Arc<C> {
    fn has(&self, f: FnId, key: &str) -> bool {
        (**self).has(f, key)
    }

    fn get(&self, f: FnId, key: &str) -> Option<V> {
        (**self).get(f, key)
    }

    fn set(&self, f: FnId, key: String, value: V) -> &Self {
        (**self).set(f, key, value);
        self
    }

    fn entries(&self, f: FnId) -> Vec<(String, V)> {
        (**self).entries(f)
    }

    fn count(&self, f: FnId) -> usize {
        (**self).count(f)
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Current number of entries across all functions
    pub entries: usize,
    /// Number of lookups that found a value
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn new(entries: usize, hits: u64, misses: u64) -> Self {
        CacheStats {
            entries,
            hits,
            misses,
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
        }
    }
}
