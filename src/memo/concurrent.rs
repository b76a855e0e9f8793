//! Thread-safe memo cache
//!
//! The walker assumes a single reader and writer per evaluation. When several
//! threads each run their own evaluations against one shared table, the table
//! needs its own synchronisation; this cache gets it from DashMap's sharded
//! locks and atomic counters.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{CacheStats, FnId, MemoCache};

/// Memoization cache safe to share between threads (wrap it in an `Arc`).
pub struct ConcurrentMemoCache<V> {
    /// Per-function tables (lock-free reads across functions)
    tables: DashMap<FnId, HashMap<String, V>>,
    /// Hit count for statistics (atomic, lock-free)
    hits: AtomicU64,
    /// Miss count for statistics (atomic, lock-free)
    misses: AtomicU64,
}

impl<V> fmt::Debug for ConcurrentMemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMemoCache")
            .field("functions", &self.tables.len())
            .field("entries", &self.len())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V> Default for ConcurrentMemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ConcurrentMemoCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.tables.clear();
    }

    /// Total number of entries across all functions
    pub fn len(&self) -> usize {
        self.tables.iter().map(|table| table.len()).sum()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.len(),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

impl<V: Clone> MemoCache<V> for ConcurrentMemoCache<V> {
    fn has(&self, f: FnId, key: &str) -> bool {
        self.tables
            .get(&f)
            .is_some_and(|table| table.contains_key(key))
    }

    fn get(&self, f: FnId, key: &str) -> Option<V> {
        let found = self
            .tables
            .get(&f)
            .and_then(|table| table.get(key).cloned());
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    fn set(&self, f: FnId, key: String, value: V) -> &Self {
        self.tables.entry(f).or_default().insert(key, value);
        self
    }

    fn entries(&self, f: FnId) -> Vec<(String, V)> {
        self.tables
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
        self.tables.get(&f).map_or(0, |table| table.len())
    }
}
