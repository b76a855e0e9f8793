//! Capacity-bounded memo cache with LRU eviction
//!
//! Evicting an entry only costs a recomputation the next time its key is
//! walked; the walker treats a missing entry as "not computed yet".

use std::cell::{Cell, RefCell};
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use super::{CacheStats, FnId, MemoCache};

/// Memoization cache holding at most `capacity` entries across all functions.
pub struct BoundedMemoCache<V> {
    entries: RefCell<LruCache<(FnId, String), V>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<V> fmt::Debug for BoundedMemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        f.debug_struct("BoundedMemoCache")
            .field("entries", &entries.len())
            .field("capacity", &entries.cap())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}

impl<V> BoundedMemoCache<V> {
    /// Create a cache evicting the least recently used entry beyond `capacity`
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RefCell::new(LruCache::new(capacity)),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.entries.borrow().cap().get()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Total number of entries across all functions
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.len(), self.hits.get(), self.misses.get())
    }
}

impl<V: Clone> MemoCache<V> for BoundedMemoCache<V> {
    fn has(&self, f: FnId, key: &str) -> bool {
        // `contains` does not touch recency
        self.entries.borrow().contains(&(f, key.to_string()))
    }

    fn get(&self, f: FnId, key: &str) -> Option<V> {
        let found = self
            .entries
            .borrow_mut()
            .get(&(f, key.to_string()))
            .cloned();
        match found {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    fn set(&self, f: FnId, key: String, value: V) -> &Self {
        self.entries.borrow_mut().put((f, key), value);
        self
    }

    fn entries(&self, f: FnId) -> Vec<(String, V)> {
        self.entries
            .borrow()
            .iter()
            .filter(|((id, _), _)| *id == f)
            .map(|((_, key), value)| (key.clone(), value.clone()))
            .collect()
    }
}
