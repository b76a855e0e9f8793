//! Unbounded single-threaded memo cache

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use super::{CacheStats, FnId, MemoCache};

/// Default memoization cache.
///
/// Keeps one table per function identity and never evicts: an entry lives as
/// long as the cache does. Interior mutability is `RefCell`, so the cache is
/// confined to one thread; see [`ConcurrentMemoCache`] for shared use.
///
/// [`ConcurrentMemoCache`]: super::ConcurrentMemoCache
pub struct DefaultMemoCache<V> {
    tables: RefCell<HashMap<FnId, HashMap<String, V>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<V> fmt::Debug for DefaultMemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMemoCache")
            .field("functions", &self.tables.borrow().len())
            .field("entries", &self.len())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}

impl<V> Default for DefaultMemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> DefaultMemoCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            tables: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Drop every entry of every function
    pub fn clear(&self) {
        self.tables.borrow_mut().clear();
    }

    /// Drop the table of one function
    pub fn clear_fn(&self, f: FnId) {
        self.tables.borrow_mut().remove(&f);
    }

    /// Total number of entries across all functions
    pub fn len(&self) -> usize {
        self.tables.borrow().values().map(HashMap::len).sum()
    }

    /// Check if the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.len(), self.hits.get(), self.misses.get())
    }
}

impl<V: Clone> MemoCache<V> for DefaultMemoCache<V> {
    fn has(&self, f: FnId, key: &str) -> bool {
        self.tables
            .borrow()
            .get(&f)
            .is_some_and(|table| table.contains_key(key))
    }

    fn get(&self, f: FnId, key: &str) -> Option<V> {
        let found = self
            .tables
            .borrow()
            .get(&f)
            .and_then(|table| table.get(key).cloned());
        match found {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    fn set(&self, f: FnId, key: String, value: V) -> &Self {
        self.tables
            .borrow_mut()
            .entry(f)
            .or_default()
            .insert(key, value);
        self
    }

    fn entries(&self, f: FnId) -> Vec<(String, V)> {
        self.tables
            .borrow()
            .get(&f)
            .map(|table| {
                table
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn count(&self, f: FnId) -> usize {
        self.tables.borrow().get(&f).map_or(0, HashMap::len)
    }
}
